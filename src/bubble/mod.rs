pub mod config;
pub mod easing;
pub mod geometry;
pub mod instance;
pub mod mode;
pub mod oscillation;
pub mod packing;
pub mod perimeter;
pub mod scene;
pub mod schedule;
pub mod transitions;
pub mod zero_sum;

pub use config::BubbleConfig;
pub use instance::BubbleInstance;
pub use mode::BubbleMode;
pub use scene::{BubbleScene, MessageDirection};
