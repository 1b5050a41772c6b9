/// Precomputed similarity catalog
///
/// Holds the movie list and a dense, square similarity matrix produced offline.
/// Row `i` scores every movie against movie `i`; looking up neighbors is a sort
/// over that row.
use crate::models::Movie;
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Similarity matrix has {rows} rows but catalog has {movies} movies")]
    SizeMismatch { rows: usize, movies: usize },

    #[error("Similarity row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    movies: Vec<Movie>,
    similarity: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    similarity: Vec<Vec<f32>>,
    /// Title → row index, first occurrence wins
    indices: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, checking the matrix shape against the movie list
    pub fn new(movies: Vec<Movie>, similarity: Vec<Vec<f32>>) -> Result<Self, CatalogError> {
        if similarity.len() != movies.len() {
            return Err(CatalogError::SizeMismatch {
                rows: similarity.len(),
                movies: movies.len(),
            });
        }

        if let Some((row, cols)) = similarity
            .iter()
            .enumerate()
            .find(|(_, cols)| cols.len() != movies.len())
        {
            return Err(CatalogError::NotSquare {
                row,
                expected: movies.len(),
                found: cols.len(),
            });
        }

        let mut indices = HashMap::with_capacity(movies.len());
        for (idx, movie) in movies.iter().enumerate() {
            indices.entry(movie.title.clone()).or_insert(idx);
        }

        Ok(Self {
            movies,
            similarity,
            indices,
        })
    }

    /// Loads a catalog from a JSON file of the form
    /// `{"movies": [{"id": .., "title": ..}], "similarity": [[..]]}`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let file: CatalogFile = serde_json::from_str(&raw)?;
        let catalog = Self::new(file.movies, file.similarity)?;

        tracing::info!(
            path = %path.as_ref().display(),
            movies = catalog.len(),
            "Loaded similarity catalog"
        );

        Ok(catalog)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Returns the `top_n` movies most similar to `title`, best first.
    ///
    /// Returns `None` when the title is not in the catalog. The queried movie
    /// itself is never part of the result; equal scores keep catalog order.
    pub fn recommend(&self, title: &str, top_n: usize) -> Option<Vec<(Movie, f32)>> {
        let idx = *self.indices.get(title)?;

        let mut scores: Vec<(usize, f32)> = self.similarity[idx]
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .collect();

        scores.sort_by(|a, b| b.1.total_cmp(&a.1));

        Some(
            scores
                .into_iter()
                .take(top_n)
                .map(|(i, score)| (self.movies[i].clone(), score))
                .collect(),
        )
    }
}
