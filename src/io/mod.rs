pub mod walker;

pub use walker::FileWalker;
