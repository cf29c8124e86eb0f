// Purpose: voices, allocation and the mix bus
// Control-side state lives behind Arc<VoiceState>; the audio thread owns Voice and Mixer.

pub mod mixer;
pub mod pool;
pub mod voice;

pub use mixer::Mixer;
pub use pool::{VoicePool, VoiceRef};
pub use voice::{Voice, VoiceSnapshot, VoiceState};
