pub mod noise;
pub mod shapes;
pub mod user_wave;

pub use noise::NoiseSource;
pub use shapes::normalize_phase;
pub use user_wave::{UserWave, WaveTable};
