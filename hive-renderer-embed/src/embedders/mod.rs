//! Platform recognizers.

mod spotify;
mod three_speak;
mod twitch;
mod twitter;
mod vimeo;
mod youtube;

pub use spotify::SpotifyEmbedder;
pub use three_speak::ThreeSpeakEmbedder;
pub use twitch::TwitchEmbedder;
pub use twitter::TwitterEmbedder;
pub use vimeo::VimeoEmbedder;
pub use youtube::YoutubeEmbedder;
