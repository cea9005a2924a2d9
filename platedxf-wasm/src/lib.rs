use platedxf_core::{
    Bitmap, FontOutlineSource, LabelConfig, LabelError, LabelItem, render_label,
};
use platedxf_dxf::MIME_TYPE;
use platedxf_fonts::CompositeFontProvider;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct LabelOutput {
    dxf: String,
    file_name: String,
    diagnostics: String,
    has_error: bool,
}

#[wasm_bindgen]
impl LabelOutput {
    #[wasm_bindgen(getter)]
    pub fn dxf(&self) -> String {
        self.dxf.clone()
    }

    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// MIME type to attach when offering `dxf` as a download.
    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        MIME_TYPE.to_owned()
    }

    #[wasm_bindgen(getter)]
    pub fn diagnostics(&self) -> String {
        self.diagnostics.clone()
    }

    #[wasm_bindgen(getter, js_name = hasError)]
    pub fn has_error(&self) -> bool {
        self.has_error
    }
}

/// Render one label with the embedded fonts.
///
/// `bitmap_text` is the barcode grid in text form (empty for none);
/// `config_json` is a partial configuration (empty for defaults).
#[wasm_bindgen]
pub fn generate_dxf(prefix: &str, number: &str, bitmap_text: &str, config_json: &str) -> LabelOutput {
    generate(&LabelItem::new(prefix, number), bitmap_text, config_json)
}

fn failed(item: &LabelItem, message: String) -> LabelOutput {
    LabelOutput {
        dxf: String::new(),
        file_name: String::new(),
        diagnostics: format!("error {item}: {message}"),
        has_error: true,
    }
}

fn generate(item: &LabelItem, bitmap_text: &str, config_json: &str) -> LabelOutput {
    let config = if config_json.trim().is_empty() {
        LabelConfig::default()
    } else {
        match serde_json::from_str::<LabelConfig>(config_json) {
            Ok(config) => config,
            Err(e) => return failed(item, format!("invalid config: {e}")),
        }
    };

    let fonts = match CompositeFontProvider::new() {
        Ok(fonts) => fonts,
        Err(e) => return failed(item, e.to_string()),
    };
    let bitmaps = |payload: &str| {
        let unavailable = |reason: String| LabelError::BitmapUnavailable {
            payload: payload.to_owned(),
            reason,
        };
        if bitmap_text.trim().is_empty() {
            Err(unavailable("no bitmap supplied".into()))
        } else {
            Bitmap::parse_text(bitmap_text).map_err(|e| unavailable(e.to_string()))
        }
    };

    match render_label(item, &config, &FontOutlineSource::new(&fonts), &bitmaps) {
        Ok(label) => LabelOutput {
            dxf: label.to_dxf(),
            file_name: label.file_name(),
            diagnostics: label
                .diagnostics
                .iter()
                .map(|note| format!("warning {note}"))
                .collect::<Vec<_>>()
                .join("\n"),
            has_error: false,
        },
        Err(e) => failed(item, e.to_string()),
    }
}
