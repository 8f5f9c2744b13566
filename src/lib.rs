pub mod boundary;
pub mod editor;
pub mod scene;
