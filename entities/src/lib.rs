pub mod archive;
pub mod feeds;
pub mod prefectures;
pub mod snapshots;
