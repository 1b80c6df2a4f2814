pub mod gallery;
pub mod media;
pub mod upload;
