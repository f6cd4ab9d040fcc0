/// Output filename derivation
///
/// Converted files keep the stem of their source name and swap the
/// extension for `.webp`.

/// Input extensions the file picker offers (matched case-insensitively)
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Canonical extension of the output format
pub const OUTPUT_EXTENSION: &str = "webp";

/// Derive the output filename from a source display name.
///
/// A trailing accepted extension is replaced with `.webp`, keeping the
/// case of the stem. Names without an accepted extension get `.webp`
/// appended so the written file never carries a misleading extension;
/// the picker filter makes that path unreachable in normal use.
pub fn derive_output_name(source_name: &str) -> String {
    if let Some(dot) = source_name.rfind('.') {
        let extension = &source_name[dot + 1..];
        let accepted = ACCEPTED_EXTENSIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(extension));
        if accepted {
            return format!("{}.{}", &source_name[..dot], OUTPUT_EXTENSION);
        }
    }
    format!("{source_name}.{OUTPUT_EXTENSION}")
}
