pub mod catalog;
pub mod requests;

pub use catalog::{
    ArtistResponse, CreatedResponse, FavoritesResponse, PlaylistResponse, SuccessResponse,
};
pub use requests::{
    AddSongRequest, CheckedRequest, CreateArtistRequest, CreatePlaylistRequest, SongRefRequest,
};
