mod locomotion;
mod path;

pub use locomotion::{ARRIVAL_THRESHOLD, COLLISION_EPS, Locomotion, clip_displacement};
pub use path::{Path, find_path, find_random_reachable_path};
