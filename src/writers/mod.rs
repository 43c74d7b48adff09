//! Level-aware sink implementations

pub mod all_levels;
pub mod console;
pub mod file;
pub mod memory;
pub mod router;

pub use all_levels::AllLevelsWriter;
pub use console::ConsoleWriter;
pub use file::FileWriter;
pub use memory::MemoryWriter;
pub use router::LevelRouter;

pub use crate::core::LevelWriter;
