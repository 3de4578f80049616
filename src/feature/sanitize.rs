use std::borrow::Cow;

/// Separator used by the storage and template addressing scheme.
const PATH_SEPARATOR: char = '.';
const REPLACEMENT: char = '_';

/// Make a raw, user-controlled property key safe to use as a storage field
/// name and as a template identifier: every `.` becomes `_`, everything else
/// is kept as is.
pub fn sanitize_key(key: &str) -> Cow<'_, str> {
    if key.contains(PATH_SEPARATOR) {
        Cow::Owned(key.replace(PATH_SEPARATOR, &REPLACEMENT.to_string()))
    } else {
        Cow::Borrowed(key)
    }
}

/// True when `key` is already safe to store.
pub fn is_sanitized(key: &str) -> bool {
    !key.contains(PATH_SEPARATOR)
}
