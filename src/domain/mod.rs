pub mod channels;
pub mod playlists;
pub mod videos;
