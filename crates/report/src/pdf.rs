use std::{fmt::Display, fs::File, io::BufWriter, path::Path};

use gymlog_domain::{ErrorKind, GymError};
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 7.0;
const TITLE_SIZE: f32 = 16.0;
const TEXT_SIZE: f32 = 12.0;
const LAYER: &str = "Layer 1";

/// Write `title` and `lines` to an A4 document, continuing on a new page when a page is full.
pub(crate) fn render(title: &str, lines: &[String], path: &Path) -> Result<(), GymError> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let title_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;
    let text_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;

    let top = PAGE_HEIGHT - MARGIN;
    let mut current_layer = doc.get_page(page).get_layer(layer);
    current_layer.use_text(title, TITLE_SIZE, Mm(MARGIN), Mm(top), &title_font);
    let mut y = top - 2.0 * LINE_HEIGHT;

    for line in lines {
        if y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            current_layer = doc.get_page(page).get_layer(layer);
            y = top;
        }
        current_layer.use_text(line.as_str(), TEXT_SIZE, Mm(MARGIN), Mm(y), &text_font);
        y -= LINE_HEIGHT;
    }

    let file = File::create(path).map_err(render_error)?;
    doc.save(&mut BufWriter::new(file)).map_err(render_error)
}

fn render_error(err: impl Display) -> GymError {
    ErrorKind::Report(format!("failed to write report: {err}")).into()
}
