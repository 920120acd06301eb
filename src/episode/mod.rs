mod download;
mod filename;

pub use download::{WRITE_CHUNK_SIZE, download_to_file};
pub use filename::{
    DATE_FORMAT, UNDATED, UNTITLED, date_stamp, entry_title, generate_filename, slugify,
    target_path,
};
