//! File names shared by the two pipeline stages.
//!
//! The IR file is written by `quadra` and read by `quadra-asm`; both take its
//! name from the same [`Config`], so the stages cannot disagree on it.

use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_SOURCE: &str = "input.custom";
pub const DEFAULT_IR: &str = "output.tac";
pub const DEFAULT_ASM: &str = "output_asm.txt";

pub const SOURCE_VAR: &str = "QUADRA_SOURCE";
pub const IR_VAR: &str = "QUADRA_IR";
pub const ASM_VAR: &str = "QUADRA_ASM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program source read by the front stage.
    pub source: PathBuf,
    /// Serialized quadruples, the hand-off between the stages.
    pub ir: PathBuf,
    /// Pseudo-assembly written by the back stage.
    pub asm: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.into(),
            ir: DEFAULT_IR.into(),
            asm: DEFAULT_ASM.into(),
        }
    }
}

impl Config {
    /// Defaults, overridden by `QUADRA_SOURCE`, `QUADRA_IR` and `QUADRA_ASM`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .map_or_else(|| PathBuf::from(default), PathBuf::from)
        };

        Self {
            source: pick(SOURCE_VAR, DEFAULT_SOURCE),
            ir: pick(IR_VAR, DEFAULT_IR),
            asm: pick(ASM_VAR, DEFAULT_ASM),
        }
    }
}
