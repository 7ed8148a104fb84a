//! vocadeck-apkg: writes decks as Anki `.apkg` packages and reads them back.
//!
//! A package is a zip archive holding a schema-11 SQLite collection
//! (`collection.anki2`), a `media` JSON map and the media files stored under
//! numeric names.

pub mod collection;
pub mod ids;
pub mod model;
pub mod package;
pub mod reader;
pub mod render;
pub mod schema;

pub use model::{CardFormat, NoteModel};
pub use package::ApkgEmitter;
pub use reader::{read_package, PackageContents, PackageModel, PackageNote};
