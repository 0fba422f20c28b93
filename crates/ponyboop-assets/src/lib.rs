//! Pony asset catalogue and archive manifest resolution.
//!
//! A pony ships as an archive with one folder of images. This crate knows
//! which image plays which role, how to find those images among the
//! archive's entry paths, and how to turn the folder name into a display
//! name. Decoding the archive and the images is left to the host.

use std::collections::BTreeMap;
use std::fmt;

use ponyboop_core::DisplayState;

/// Every image a pony can show.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PonyAsset {
    Resting,
    Booped1,
    Booped2,
    Booped3,
    Booped4,
    CutieMark,
    Inactive,
    Scared,
    Frame,
    Broken,
}

impl PonyAsset {
    /// Assets that must be present in every archive, in resolution order.
    pub const REQUIRED: [PonyAsset; 9] = [
        PonyAsset::Resting,
        PonyAsset::Booped1,
        PonyAsset::Booped2,
        PonyAsset::Booped3,
        PonyAsset::Booped4,
        PonyAsset::CutieMark,
        PonyAsset::Inactive,
        PonyAsset::Scared,
        PonyAsset::Frame,
    ];

    /// The image shown for a display state.
    pub fn for_display_state(state: DisplayState) -> Self {
        match state {
            DisplayState::Resting => PonyAsset::Resting,
            DisplayState::Booped1 => PonyAsset::Booped1,
            DisplayState::Booped2 => PonyAsset::Booped2,
            DisplayState::Booped3 => PonyAsset::Booped3,
            DisplayState::Booped4 => PonyAsset::Booped4,
            DisplayState::Broken => PonyAsset::Broken,
            DisplayState::Scared => PonyAsset::Scared,
            DisplayState::Inactive => PonyAsset::Inactive,
        }
    }

    /// File name suffix identifying this asset inside an archive. `Broken`
    /// has none and borrows the `Booped4` image.
    pub fn entry_suffix(self) -> Option<&'static str> {
        match self {
            PonyAsset::Resting => Some("/0.png"),
            PonyAsset::Booped1 => Some("/1.png"),
            PonyAsset::Booped2 => Some("/2.png"),
            PonyAsset::Booped3 => Some("/3.png"),
            PonyAsset::Booped4 => Some("/4.png"),
            PonyAsset::CutieMark => Some("/cm.png"),
            PonyAsset::Inactive => Some("/inactivity.png"),
            PonyAsset::Scared => Some("/move.png"),
            PonyAsset::Frame => Some("/layout.png"),
            PonyAsset::Broken => None,
        }
    }

    /// Whether an archive entry path holds this asset. Case-insensitive.
    pub fn matches_entry(self, path: &str) -> bool {
        let Some(suffix) = self.entry_suffix() else {
            return false;
        };
        path.len() >= suffix.len()
            && path.is_char_boundary(path.len() - suffix.len())
            && path[path.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    }

    pub fn name(self) -> &'static str {
        match self {
            PonyAsset::Resting => "resting",
            PonyAsset::Booped1 => "booped-1",
            PonyAsset::Booped2 => "booped-2",
            PonyAsset::Booped3 => "booped-3",
            PonyAsset::Booped4 => "booped-4",
            PonyAsset::CutieMark => "cutie-mark",
            PonyAsset::Inactive => "inactive",
            PonyAsset::Scared => "scared",
            PonyAsset::Frame => "frame",
            PonyAsset::Broken => "broken",
        }
    }
}

impl fmt::Display for PonyAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetError {
    MissingAsset(PonyAsset),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::MissingAsset(asset) => write!(f, "no file found for the {asset} asset"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Turns an archive folder name into a pony's display name.
///
/// The first `_`-separated token is an ordering prefix and is dropped. The
/// rest is joined with spaces and split before every uppercase letter:
/// `"a16_MintyFresh"` becomes `"Minty Fresh"`.
pub fn extract_pony_name(folder_name: &str) -> String {
    let joined = folder_name.split('_').skip(1).collect::<Vec<_>>().join(" ");
    let mut spaced = String::with_capacity(joined.len() + 8);
    for ch in joined.chars() {
        if ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }
    spaced.trim().to_owned()
}

/// The folder directly containing an archive entry.
fn parent_folder(path: &str) -> &str {
    let mut components = path.rsplit('/');
    let file = components.next().unwrap_or(path);
    components.next().unwrap_or(file)
}

/// Which archive entry backs each asset of one pony.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PonyManifest {
    name: String,
    entries: BTreeMap<PonyAsset, String>,
}

impl PonyManifest {
    /// Resolves every required asset to the first matching entry path.
    ///
    /// The pony's name comes from the folder holding the last resolved
    /// entry.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, AssetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths: Vec<S> = entries.into_iter().collect();
        let mut resolved = BTreeMap::new();
        let mut folder = "";
        for asset in PonyAsset::REQUIRED {
            let path = paths
                .iter()
                .map(S::as_ref)
                .find(|path| asset.matches_entry(path))
                .ok_or(AssetError::MissingAsset(asset))?;
            log::trace!("{asset} resolved to {path}");
            folder = parent_folder(path);
            resolved.insert(asset, path.to_owned());
        }
        let name = extract_pony_name(folder);
        log::debug!("resolved pony {name:?} from folder {folder:?}");
        Ok(Self {
            name,
            entries: resolved,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The archive entry for `asset`. `Broken` falls back to `Booped4`.
    pub fn entry(&self, asset: PonyAsset) -> Option<&str> {
        self.entries
            .get(&asset)
            .or_else(|| match asset {
                PonyAsset::Broken => self.entries.get(&PonyAsset::Booped4),
                _ => None,
            })
            .map(String::as_str)
    }

    /// The archive entry to draw for a display state.
    pub fn entry_for_state(&self, state: DisplayState) -> Option<&str> {
        self.entry(PonyAsset::for_display_state(state))
    }

    pub fn iter(&self) -> impl Iterator<Item = (PonyAsset, &str)> + '_ {
        self.entries
            .iter()
            .map(|(&asset, path)| (asset, path.as_str()))
    }
}

#[cfg(test)]
#[path = "tests/assets_tests.rs"]
mod tests;
