use rand::Rng;

use crate::{
    dao::models::{CatalogueEntity, SongEntity},
    utils::{dedup, shuffle_with},
};

/// Runtime representation of a song to be guessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Path of the audio resource; identifies the song.
    pub uri: String,
    /// Accepted answer.
    pub display_name: String,
    /// Label shown alongside the audio.
    pub name: String,
}

impl Song {
    /// Whether `guess` names this song, ignoring case.
    ///
    /// The comparison is exact apart from case folding: no trimming and no
    /// fuzzy matching.
    pub fn is_answered_by(&self, guess: &str) -> bool {
        guess.to_lowercase() == self.display_name.to_lowercase()
    }
}

/// Songs and suggestions for one session, ready to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    /// Songs in play order.
    pub songs: Vec<Song>,
    /// Distinct answers offered as suggestions.
    pub possibilities: Vec<String>,
}

impl Catalogue {
    /// Shuffle the songs and deduplicate the possibilities of a fetched document.
    pub fn prepare(entity: CatalogueEntity) -> Self {
        Self::prepare_with(entity, &mut rand::rng())
    }

    /// Same as [`Catalogue::prepare`] with an explicit random source.
    pub fn prepare_with<R>(entity: CatalogueEntity, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut songs: Vec<Song> = entity.songs.into_iter().map(Into::into).collect();
        shuffle_with(&mut songs, rng);

        Self {
            songs,
            possibilities: dedup(&entity.possibilities),
        }
    }
}

impl From<SongEntity> for Song {
    fn from(value: SongEntity) -> Self {
        Self {
            uri: value.uri,
            display_name: value.display_name,
            name: value.name,
        }
    }
}

impl From<Song> for SongEntity {
    fn from(value: Song) -> Self {
        Self {
            uri: value.uri,
            display_name: value.display_name,
            name: value.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn song(uri: &str, display_name: &str) -> SongEntity {
        SongEntity {
            uri: uri.into(),
            display_name: display_name.into(),
            name: format!("{display_name} (OST)"),
        }
    }

    #[test]
    fn answer_matching_folds_case_only() {
        let song: Song = song("a.mp3", "Moonlight Sonata").into();

        assert!(song.is_answered_by("moonlight sonata"));
        assert!(song.is_answered_by("MOONLIGHT SONATA"));
        assert!(!song.is_answered_by(" moonlight sonata"));
        assert!(!song.is_answered_by("moonlight"));
    }

    #[test]
    fn prepare_shuffles_songs_and_dedups_possibilities() {
        let entity = CatalogueEntity {
            songs: (0..10).map(|i| song(&format!("{i}.mp3"), &format!("Song {i}"))).collect(),
            possibilities: vec!["B".into(), "A".into(), "B".into(), "C".into(), "A".into()],
        };

        let catalogue = Catalogue::prepare_with(entity.clone(), &mut StdRng::seed_from_u64(3));

        assert_eq!(catalogue.possibilities, vec!["B", "A", "C"]);
        let mut uris: Vec<&str> = catalogue.songs.iter().map(|s| s.uri.as_str()).collect();
        uris.sort_unstable();
        let mut expected: Vec<&str> = entity.songs.iter().map(|s| s.uri.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(uris, expected);
    }
}
