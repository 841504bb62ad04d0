// src/application/mod.rs
pub mod bucket_manager;
pub mod demo;
pub mod note_loader;
pub mod note_reader;
pub mod note_repository;
pub mod object_store;
pub mod table_provisioner;

pub use bucket_manager::BucketManager;
pub use demo::{BucketDemo, BucketDemoSettings, NotesDemo, NotesDemoSettings};
pub use note_loader::NoteLoader;
pub use note_reader::{NoteReader, Page};
pub use note_repository::{NoteRepository, ScanPage};
pub use object_store::ObjectStore;
pub use table_provisioner::{Provisioning, TableProvisioner};
