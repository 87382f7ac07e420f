//! Option set forwarded to the ISM scoring tool.
//!
//! Each option is a flag plus an [`OptionValue`]. Serialization matches on
//! the variant, so what a flag turns into on the command line is decided by
//! how it was declared rather than by inspecting the value at runtime.

use std::borrow::Cow;

/// Value carried by one declared option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Not set; the flag is omitted entirely.
    Absent,
    /// Boolean switch; emitted bare when `true`, omitted when `false`.
    Flag(bool),
    /// Emitted after the flag, quoted if it contains a wildcard.
    Value(String),
    /// Replaced with the per-job output path at serialization time.
    OutputOverride,
}

impl From<Option<String>> for OptionValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// A declared flag and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOption {
    pub flag: &'static str,
    pub value: OptionValue,
}

impl ToolOption {
    pub fn new(flag: &'static str, value: impl Into<OptionValue>) -> Self {
        Self {
            flag,
            value: value.into(),
        }
    }
}

/// Wrap `value` in double quotes if it contains a `*`, so the shell passes
/// the pattern through to the tool unexpanded.
pub fn quote_wildcards(value: &str) -> Cow<'_, str> {
    if value.contains('*') {
        Cow::Owned(format!("\"{value}\""))
    } else {
        Cow::Borrowed(value)
    }
}

/// Serialize `options` in declaration order.
///
/// Every emitted option is prefixed with a single space, so the result can
/// be appended directly to a command. Returns an empty string when nothing
/// is emitted.
pub fn serialize_options(options: &[ToolOption], out_path: &str) -> String {
    let mut out = String::new();
    for opt in options {
        match &opt.value {
            OptionValue::Absent | OptionValue::Flag(false) => {}
            OptionValue::Flag(true) => {
                out.push(' ');
                out.push_str(opt.flag);
            }
            OptionValue::Value(value) => {
                out.push(' ');
                out.push_str(opt.flag);
                out.push(' ');
                out.push_str(&quote_wildcards(value));
            }
            OptionValue::OutputOverride => {
                out.push(' ');
                out.push_str(opt.flag);
                out.push(' ');
                out.push_str(&quote_wildcards(out_path));
            }
        }
    }
    out
}

/// Split label that selects every split; routes the `--data` override into
/// each job instead of the per-instance data folder.
pub const ALL_SPLITS: &str = "*";

/// User-facing options of the ISM scoring tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsmOptions {
    /// Length of the 3' sequence to mutate.
    pub mut_len: Option<u32>,
    /// Output directory name, created under each fold/cross instance.
    pub out_dir: String,
    /// Dataset split label used to select the TFRecord pattern.
    pub split_label: String,
}

impl Default for IsmOptions {
    fn default() -> Self {
        Self {
            mut_len: None,
            out_dir: "ism".to_string(),
            split_label: "test".to_string(),
        }
    }
}

impl IsmOptions {
    /// The declared option set, in the order it is forwarded.
    pub fn option_set(&self) -> Vec<ToolOption> {
        vec![
            ToolOption::new("-l", self.mut_len.map(|n| n.to_string())),
            ToolOption {
                flag: "-o",
                value: OptionValue::OutputOverride,
            },
            ToolOption::new("--split", Some(self.split_label.clone())),
        ]
    }

    /// Serialized option string for one job writing to `out_path`.
    pub fn to_args(&self, out_path: &str) -> String {
        serialize_options(&self.option_set(), out_path)
    }

    pub fn selects_all_splits(&self) -> bool {
        self.split_label == ALL_SPLITS
    }
}
