use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};

/// Serializes canvas pixels as a PNG file in memory
pub fn encode_png(pixels: &RgbaImage) -> EditorResult<Vec<u8>> {
    let mut bytes = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(EditorError::Encode)?;
    Ok(bytes)
}

/// Writes the PNG into the configured export directory, returning where it went.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_png(pixels: &RgbaImage, config: &EditorConfig) -> EditorResult<std::path::PathBuf> {
    let bytes = encode_png(pixels)?;
    let path = config.export_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, bytes)?;
    log::info!("Saved canvas to {}", path.display());
    Ok(path)
}

/// Hands the PNG to the browser as a file download.
#[cfg(target_arch = "wasm32")]
pub fn save_png(pixels: &RgbaImage, config: &EditorConfig) -> EditorResult<std::path::PathBuf> {
    use eframe::wasm_bindgen::JsCast as _;

    let bytes = encode_png(pixels)?;
    let web_err = |err: eframe::wasm_bindgen::JsValue| EditorError::Web(format!("{err:?}"));

    let array = js_sys::Uint8Array::from(bytes.as_slice());
    let parts = js_sys::Array::of1(&array);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/png");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(web_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(web_err)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| EditorError::Web("no document".to_owned()))?;
    let link = document
        .create_element("a")
        .map_err(web_err)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| EditorError::Web("not an anchor element".to_owned()))?;
    link.set_href(&url);
    link.set_download(&config.export_file_name);
    link.click();
    web_sys::Url::revoke_object_url(&url).map_err(web_err)?;

    log::info!("Downloaded canvas as {}", config.export_file_name);
    Ok(std::path::PathBuf::from(&config.export_file_name))
}
