//! Default matching engine: fingerprinted sliding windows.
//!
//! Every window of `minimum_token_count` consecutive tokens is hashed;
//! windows sharing a fingerprint at two or more positions seed a match, and
//! runs of consecutive duplicated windows merge into one maximal match.
//! All intermediate collections are ordered so identical input always
//! produces identical output.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::{DuplicateMatch, Occurrence};
use crate::engine::{Engine, EngineError, EngineOptions, Token, TokenizedFile};

pub struct HashEngine;

/// (file index, token index) of one window start.
type Position = (usize, usize);

impl Engine for HashEngine {
    fn find_matches(
        &self,
        options: &EngineOptions,
        files: &[TokenizedFile],
    ) -> Result<Vec<DuplicateMatch>, EngineError> {
        let window = options.minimum_token_count;
        if window == 0 {
            return Err(EngineError::InvalidOptions(
                "minimum token count must be positive".to_string(),
            ));
        }

        let groups = duplicated_window_groups(files, window);
        let candidates = merge_window_runs(&groups, window);

        let mut matches: Vec<DuplicateMatch> = candidates
            .into_iter()
            .filter_map(|(positions, length)| build_match(files, &positions, length))
            .collect();

        matches.sort_by(|a, b| {
            b.token_count
                .cmp(&a.token_count)
                .then_with(|| a.occurrences[0].cmp(&b.occurrences[0]))
        });
        Ok(matches)
    }
}

/// Group all window start positions by fingerprint and keep the groups that
/// occur more than once.
fn duplicated_window_groups(
    files: &[TokenizedFile],
    window: usize,
) -> BTreeSet<Vec<Position>> {
    let mut by_fingerprint: BTreeMap<String, Vec<Position>> = BTreeMap::new();

    for (file_idx, file) in files.iter().enumerate() {
        if file.tokens.len() < window {
            continue;
        }
        for start in 0..=file.tokens.len() - window {
            let fp = fingerprint(&file.tokens[start..start + window]);
            by_fingerprint.entry(fp).or_default().push((file_idx, start));
        }
    }

    by_fingerprint
        .into_values()
        .filter(|positions| positions.len() > 1)
        .map(|mut positions| {
            positions.sort_unstable();
            positions
        })
        .collect()
}

/// Merge runs of consecutive duplicated windows: a group whose every
/// position is the predecessor group's shifted by one token extends that
/// group's match by one token.
fn merge_window_runs(
    groups: &BTreeSet<Vec<Position>>,
    window: usize,
) -> Vec<(Vec<Position>, usize)> {
    let mut runs = Vec::new();

    for group in groups {
        // Only run starts: skip groups covered by their predecessor.
        if let Some(previous) = shift(group, -1) {
            if groups.contains(&previous) {
                continue;
            }
        }

        let mut length = window;
        let mut next = shift(group, 1);
        while let Some(candidate) = next {
            if !groups.contains(&candidate) {
                break;
            }
            length += 1;
            next = shift(&candidate, 1);
        }
        runs.push((group.clone(), length));
    }
    runs
}

fn shift(positions: &[Position], by: isize) -> Option<Vec<Position>> {
    positions
        .iter()
        .map(|&(file, token)| {
            let shifted = token as isize + by;
            if shifted < 0 {
                None
            } else {
                Some((file, shifted as usize))
            }
        })
        .collect()
}

/// Project a merged run into a match, dropping occurrences that overlap an
/// earlier occurrence in the same file. Runs left with fewer than two
/// occurrences are discarded.
fn build_match(
    files: &[TokenizedFile],
    positions: &[Position],
    length: usize,
) -> Option<DuplicateMatch> {
    let mut kept: Vec<Position> = Vec::new();
    for &(file_idx, start) in positions {
        let overlaps = kept
            .iter()
            .any(|&(f, s)| f == file_idx && start < s + length && s < start + length);
        if !overlaps {
            kept.push((file_idx, start));
        }
    }
    if kept.len() < 2 {
        return None;
    }

    let mut occurrences: Vec<(Occurrence, Position)> = kept
        .into_iter()
        .map(|(file_idx, start)| {
            let file = &files[file_idx];
            let occurrence = Occurrence {
                file: file.path.clone(),
                start_line: file.tokens[start].line,
                end_line: file.tokens[start + length - 1].line,
            };
            (occurrence, (file_idx, start))
        })
        .collect();
    occurrences.sort_by(|a, b| a.0.cmp(&b.0));

    let (first, (first_file, _)) = &occurrences[0];
    let fragment = source_slice(&files[*first_file].source, first.start_line, first.end_line);
    let line_count = first.line_count();

    Some(DuplicateMatch {
        token_count: length,
        line_count,
        occurrences: occurrences.into_iter().map(|(o, _)| o).collect(),
        fragment,
    })
}

fn source_slice(source: &str, start_line: usize, end_line: usize) -> String {
    source
        .lines()
        .skip(start_line - 1)
        .take(end_line - start_line + 1)
        .collect::<Vec<_>>()
        .join("\n")
}

fn fingerprint(tokens: &[Token]) -> String {
    let mut hasher = Sha256::new();
    for token in tokens {
        hasher.update(token.text.as_bytes());
        hasher.update([0x01]);
    }
    format!("{:x}", hasher.finalize())
}
