mod size;

pub use size::{allocated_size, allocated_size_of_file};
