pub mod image;

pub use image::{COLOR_CHANNELS, ColorImage, GrayImage};
