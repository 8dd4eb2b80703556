//! Fixed extension -> mime and format -> extension tables

/// Extension table, keys lowercase with the leading dot
const MIME_TYPES: &[(&str, &str)] = &[
    (".avif", "image/avif"),
    (".bmp", "image/bmp"),
    (".gif", "image/gif"),
    (".heic", "image/heic"),
    (".ico", "image/x-icon"),
    (".jpeg", "image/jpeg"),
    (".jpg", "image/jpeg"),
    (".png", "image/png"),
    (".svg", "image/svg+xml"),
    (".tif", "image/tiff"),
    (".tiff", "image/tiff"),
    (".webp", "image/webp"),
    (".pdf", "application/pdf"),
    (".json", "application/json"),
    (".zip", "application/zip"),
    (".txt", "text/plain; charset=utf-8"),
    (".csv", "text/csv; charset=utf-8"),
    (".html", "text/html; charset=utf-8"),
    (".mp4", "video/mp4"),
    (".mov", "video/quicktime"),
    (".doc", "application/msword"),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (".xls", "application/vnd.ms-excel"),
    (
        ".xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (".ppt", "application/vnd.ms-powerpoint"),
    (
        ".pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    (".gdoc", "application/vnd.google-apps.document"),
    (".gslide", "application/vnd.google-apps.presentation"),
    (".gsheet", "application/vnd.google-apps.spreadsheet"),
    (".gdraw", "application/vnd.google-apps.drawing"),
    (".gform", "application/vnd.google-apps.form"),
    (".odt", "application/vnd.oasis.opendocument.text"),
    (".odp", "application/vnd.oasis.opendocument.presentation"),
    (".ods", "application/vnd.oasis.opendocument.spreadsheet"),
    (".oxt", "application/vnd.openofficeorg.extension"),
    (".oxps", "application/oxps"),
    (".pub", "application/x-mspublisher"),
    (".wps", "application/vnd.ms-works"),
    (".key", "application/x-iwork-keynote-sffkey"),
    (".pages", "application/x-iwork-pages-sffpages"),
    (".numbers", "application/x-iwork-numbers-sffnumbers"),
];

/// Extension of the last path element, including the dot (`"a/b.JPG"` -> `".JPG"`)
pub fn extension_of(filename: &str) -> &str {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// Mime type for an extension such as `.jpg`, case-insensitive
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let lower = extension.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == lower)
        .map(|(_, mime)| *mime)
}

/// Canonical extension for a probed format name
pub fn extension_for_format(format: &str) -> &'static str {
    match format {
        "JPEG" => ".jpg",
        "PNG" => ".png",
        "GIF" => ".gif",
        _ => "",
    }
}
