//! Remote bibliographic services

pub mod openlibrary;

pub use openlibrary::OpenLibraryClient;
