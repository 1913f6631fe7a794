use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TransferError;
use crate::song::Song;

pub const HEADER: [&str; 5] = ["vendor", "playlist-name", "song-id", "title", "artist"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One line of a playlist file. Columns are positional, in `HEADER` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub vendor_name: String,
    pub playlist_name: String,
    pub song_id: String,
    pub title: String,
    pub artist: String,
}

impl CsvRow {
    pub fn from_song(vendor_name: &str, song: &Song) -> Self {
        Self {
            vendor_name: vendor_name.to_string(),
            playlist_name: song.playlist_name.clone(),
            song_id: song.id.clone(),
            title: song.title.clone(),
            artist: song.artist.clone(),
        }
    }

    pub fn to_song(&self) -> Song {
        Song::new(
            self.song_id.clone(),
            &self.title,
            &self.artist,
            &self.playlist_name,
        )
    }
}

/// Writes the header and every row, prefixed with a UTF-8 byte order mark so
/// spreadsheet tools pick the right encoding for non-Latin text.
pub fn write_rows<'a, W: Write>(
    mut writer: W,
    rows: impl IntoIterator<Item = &'a CsvRow>,
) -> Result<(), TransferError> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Reads every data row. The first record is treated as the header whatever its
/// text, and a leading byte order mark is skipped.
pub fn read_rows<R: Read>(mut reader: R) -> Result<Vec<CsvRow>, TransferError> {
    let mut contents = Vec::new();
    reader.read_to_end(&mut contents)?;
    let contents = contents.strip_prefix(UTF8_BOM).unwrap_or(&contents[..]);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(contents);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.deserialize::<CsvRow>(None)?);
    }

    Ok(rows)
}

/// Serializes the whole file in memory before touching the disk, so a failure
/// never leaves a truncated file behind.
pub fn write_playlist_file<'a>(
    path: &Path,
    rows: impl IntoIterator<Item = &'a CsvRow>,
) -> Result<(), TransferError> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, rows)?;
    std::fs::write(path, buffer)?;
    tracing::debug!("Wrote playlist file {}", path.display());
    Ok(())
}

pub fn read_playlist_file(path: &Path) -> Result<Vec<CsvRow>, TransferError> {
    let file = std::fs::File::open(path)?;
    let rows = read_rows(file)?;
    tracing::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str, title: &str, artist: &str, playlist: &str) -> Song {
        Song::new(id, title, artist, playlist)
    }

    #[test]
    fn test_songs_survive_round_trip() {
        let songs = vec![
            song("1", "Hey Jude", "The Beatles", "Classics"),
            song("2", "밤편지", "아이유", "잔잔한 노래"),
            song("3", "Title, with \"quotes\"", "Artist\nNewline", "Mixed, Set"),
        ];
        let rows: Vec<CsvRow> = songs.iter().map(|s| CsvRow::from_song("bugs", s)).collect();

        let mut buffer = Vec::new();
        write_rows(&mut buffer, &rows).unwrap();
        let read_back = read_rows(buffer.as_slice()).unwrap();

        let read_songs: Vec<Song> = read_back.iter().map(CsvRow::to_song).collect();
        assert_eq!(read_songs, songs);
        assert!(read_back.iter().all(|row| row.vendor_name == "bugs"));
    }

    #[test]
    fn test_written_file_starts_with_bom_and_header() {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &Vec::<CsvRow>::new()).unwrap();

        assert!(buffer.starts_with(UTF8_BOM));
        let text = String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.trim_end(), "vendor,playlist-name,song-id,title,artist");
    }

    #[test]
    fn test_read_accepts_file_without_bom_and_localized_header() {
        let text = "음원사,플레이리스트 이름,노래 id,제목,아티스트\nmelon,Drive,100,Song,Singer\n";

        let rows = read_rows(text.as_bytes()).unwrap();

        assert_eq!(
            rows,
            vec![CsvRow {
                vendor_name: "melon".into(),
                playlist_name: "Drive".into(),
                song_id: "100".into(),
                title: "Song".into(),
                artist: "Singer".into(),
            }]
        );
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &Vec::<CsvRow>::new()).unwrap();

        assert!(read_rows(buffer.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn test_to_song_normalizes_decomposed_text() {
        let row = CsvRow {
            vendor_name: "genie".into(),
            playlist_name: "\u{1112}\u{1161}\u{11AB}".into(),
            song_id: "9".into(),
            title: "\u{1100}\u{1173}\u{11AF}".into(),
            artist: "A".into(),
        };

        let song = row.to_song();
        assert_eq!(song.playlist_name, "\u{D55C}");
        assert_eq!(song.title, "\u{AE00}");
    }

    #[test]
    fn test_write_and_read_playlist_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.csv");
        let rows = vec![CsvRow::from_song("bugs", &song("5", "A", "B", "C"))];

        write_playlist_file(&path, &rows).unwrap();

        assert_eq!(read_playlist_file(&path).unwrap(), rows);
    }

    #[test]
    fn test_read_rejects_short_rows() {
        let text = "vendor,playlist-name,song-id,title,artist\nbugs,only-two\n";

        assert!(read_rows(text.as_bytes()).is_err());
    }
}
