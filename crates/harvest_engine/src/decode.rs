use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decodes a listing response body into UTF-8.
///
/// The portal serves EUC-KR, usually with an honest `Content-Type`
/// charset, so the order is: BOM, then header charset, then a chardetng
/// guess. Decoding is lossy on purpose; stray bytes in ad markup must not
/// fail the whole page.
pub fn decode_listing_body(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding.decode(bytes).0.into_owned();
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return encoding.decode(bytes).0.into_owned();
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true).decode(bytes).0.into_owned()
}

fn extract_charset(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .map(str::trim)
        .find_map(|part| {
            let (key, value) = part.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim_matches(&[' ', '"', '\''][..]))
            } else {
                None
            }
        })
}
