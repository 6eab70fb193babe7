pub mod material;
pub mod plugin;
pub mod setup;
pub mod sync;

pub use material::BubbleMaterialPlugin;
pub use plugin::BubblePlugin;
