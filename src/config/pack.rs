// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::keys::SoundGroup;

/// A YAML representation of a sample pack: one ordered list of sample files
/// per sound group. The built-in default is the Savage65 pack the simulator
/// ships with.
#[derive(Deserialize, Clone, Serialize, Debug)]
pub struct SamplePack {
    /// Directory the sample files live in. Relative paths are resolved
    /// against the config file's directory; when unset, the config file's
    /// directory itself is used.
    dir: Option<String>,

    /// The sample files for each sound group.
    #[serde(default = "default_groups")]
    groups: HashMap<SoundGroup, Vec<String>>,
}

impl Default for SamplePack {
    fn default() -> SamplePack {
        SamplePack {
            dir: None,
            groups: default_groups(),
        }
    }
}

fn default_groups() -> HashMap<SoundGroup, Vec<String>> {
    let files = |prefix: &str, count: usize| -> Vec<String> {
        (1..=count)
            .map(|i| format!("Savage65-{}-{}.m4a", prefix, i))
            .collect()
    };

    HashMap::from([
        (SoundGroup::Standard, files("1u", 4)),
        (SoundGroup::Shift, files("Shift", 3)),
        (SoundGroup::Enter, files("Enter", 3)),
        (SoundGroup::Spacebar, files("Spacebar", 3)),
    ])
}

impl SamplePack {
    /// Gets the sample files for the given group.
    pub fn files(&self, group: SoundGroup) -> &[String] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Gets every sample file in the pack, in group order.
    pub fn all_files(&self) -> Vec<&str> {
        SoundGroup::ALL
            .iter()
            .flat_map(|group| self.files(*group))
            .map(String::as_str)
            .collect()
    }

    /// Clones the group lists into the shape the playback queues want.
    pub fn group_sets(&self) -> HashMap<SoundGroup, Vec<String>> {
        self.groups.clone()
    }

    /// Resolves a sample file against the pack directory and the config
    /// file's directory.
    pub fn resolve(&self, base_path: &Path, file: &str) -> PathBuf {
        if Path::new(file).is_absolute() {
            return PathBuf::from(file);
        }

        let dir = match &self.dir {
            Some(dir) if Path::new(dir).is_absolute() => PathBuf::from(dir),
            Some(dir) => base_path.join(dir),
            None => base_path.to_path_buf(),
        };
        dir.join(file)
    }

    /// Validates the pack: every group must have at least one sample, and a
    /// group may not list the same file twice (a duplicate would break the
    /// no-repeat cycle guarantee).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for group in SoundGroup::ALL {
            let files = self.groups.get(&group).ok_or_else(|| {
                ConfigError::Invalid(format!("sample group {} is missing", group))
            })?;

            if files.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "sample group {} has no samples",
                    group
                )));
            }

            let mut seen: HashSet<&str> = HashSet::new();
            for file in files {
                if !seen.insert(file) {
                    return Err(ConfigError::Invalid(format!(
                        "sample group {} lists {} more than once",
                        group, file
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
impl SamplePack {
    /// Creates a new sample pack (test only).
    pub fn new(dir: Option<String>, groups: HashMap<SoundGroup, Vec<String>>) -> SamplePack {
        SamplePack { dir, groups }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_pack_is_valid() {
        let pack = SamplePack::default();
        pack.validate().expect("default pack should validate");

        assert_eq!(4, pack.files(SoundGroup::Standard).len());
        assert_eq!(3, pack.files(SoundGroup::Shift).len());
        assert_eq!(3, pack.files(SoundGroup::Enter).len());
        assert_eq!(3, pack.files(SoundGroup::Spacebar).len());
        assert_eq!(13, pack.all_files().len());
        assert_eq!("Savage65-1u-1.m4a", pack.files(SoundGroup::Standard)[0]);
    }

    #[test]
    fn test_parse_pack() {
        let pack: SamplePack = serde_yml::from_str(
            r#"
dir: sounds
groups:
  standard: [a.wav, b.wav]
  shift: [c.wav]
  enter: [d.wav]
  spacebar: [e.wav]
"#,
        )
        .expect("pack should parse");

        pack.validate().expect("pack should validate");
        assert_eq!(vec!["a.wav", "b.wav"], pack.files(SoundGroup::Standard));
    }

    #[test]
    fn test_validate_missing_group() {
        let pack = SamplePack::new(
            None,
            HashMap::from([(SoundGroup::Standard, vec!["a.wav".to_string()])]),
        );
        let err = pack.validate().expect_err("missing groups should fail");
        assert!(err.to_string().contains("missing"), "{}", err);
    }

    #[test]
    fn test_validate_empty_group() {
        let mut groups = default_groups();
        groups.insert(SoundGroup::Enter, Vec::new());
        let pack = SamplePack::new(None, groups);
        let err = pack.validate().expect_err("empty group should fail");
        assert!(err.to_string().contains("no samples"), "{}", err);
    }

    #[test]
    fn test_validate_duplicate_file() {
        let mut groups = default_groups();
        groups.insert(
            SoundGroup::Shift,
            vec!["dup.wav".to_string(), "dup.wav".to_string()],
        );
        let pack = SamplePack::new(None, groups);
        let err = pack.validate().expect_err("duplicate file should fail");
        assert!(err.to_string().contains("more than once"), "{}", err);
    }

    #[test]
    fn test_resolve() {
        let base = Path::new("/etc/thock");

        let pack = SamplePack::default();
        assert_eq!(
            PathBuf::from("/etc/thock/a.wav"),
            pack.resolve(base, "a.wav")
        );

        let pack = SamplePack::new(Some("sounds".to_string()), default_groups());
        assert_eq!(
            PathBuf::from("/etc/thock/sounds/a.wav"),
            pack.resolve(base, "a.wav")
        );

        let pack = SamplePack::new(Some("/opt/sounds".to_string()), default_groups());
        assert_eq!(
            PathBuf::from("/opt/sounds/a.wav"),
            pack.resolve(base, "a.wav")
        );
        assert_eq!(
            PathBuf::from("/abs/b.wav"),
            pack.resolve(base, "/abs/b.wav")
        );
    }
}
