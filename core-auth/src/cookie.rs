//! Credential extraction from the `Cookie` request header.

/// Pull the named cookie's value out of a raw `Cookie` header.
///
/// Cookie values may themselves contain `=`; everything after the first `=`
/// of the matching pair is taken. Percent-escapes are decoded, matching how
/// the issuing side URL-encodes the token into the cookie.
///
/// # Examples
///
/// ```
/// use core_auth::token_from_cookie_header;
///
/// let header = "theme=dark; wl_session=abc.def.ghi";
/// assert_eq!(
///     token_from_cookie_header(Some(header), "wl_session").as_deref(),
///     Some("abc.def.ghi")
/// );
/// ```
pub fn token_from_cookie_header(header: Option<&str>, name: &str) -> Option<String> {
    let raw = header?;
    raw.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| percent_decode(value))
    })
}

/// Decode `%XX` escapes; malformed escapes pass through untouched.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
