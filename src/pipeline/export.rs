use std::path::PathBuf;

use crate::{
    config::{export::ExportConfig, output::OutputFormat},
    foundation::{
        core::FrameTime,
        error::{SheetError, SheetResult},
    },
    host::{Document, Host},
    sheet::{
        grid::SpriteGeometry,
        plan::{SheetPlan, plan_sheet},
        select::{layers_have_keyframe_at, select_frames},
    },
};

/// Name given to the composite document.
pub const SHEET_DOCUMENT_NAME: &str = "Spritesheet";

/// Outcome of a successful [`export_spritesheet`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    /// File actually written, extension included.
    pub output_path: PathBuf,
    /// Encoding used for `output_path`.
    pub format: OutputFormat,
    /// Layout that was rendered.
    pub plan: SheetPlan,
}

/// Documents opened during one export run.
///
/// Every stage receives the context explicitly; whatever is still open when the run
/// ends (successfully or not) is closed by [`ExportContext::close_all`].
struct ExportContext<D> {
    working: Option<D>,
    sheet: Option<D>,
}

impl<D: Document> ExportContext<D> {
    fn new() -> Self {
        Self {
            working: None,
            sheet: None,
        }
    }

    fn working(&mut self) -> SheetResult<&mut D> {
        self.working
            .as_mut()
            .ok_or_else(|| SheetError::host("working copy is not open"))
    }

    fn sheet(&mut self) -> SheetResult<&mut D> {
        self.sheet
            .as_mut()
            .ok_or_else(|| SheetError::host("spritesheet document is not open"))
    }

    fn close_working<H: Host<Doc = D>>(&mut self, host: &mut H) {
        if let Some(doc) = self.working.take() {
            host.close_document(doc);
        }
    }

    fn close_all<H: Host<Doc = D>>(&mut self, host: &mut H) {
        self.close_working(host);
        if let Some(doc) = self.sheet.take() {
            host.close_document(doc);
        }
    }
}

/// Frames of `doc` that go into the sheet, in order.
pub fn select_document_frames<D: Document + ?Sized>(
    doc: &D,
    ignore_empty_frames: bool,
) -> SheetResult<Vec<FrameTime>> {
    let layers = doc.top_level_layers();
    select_frames(doc.time_range(), ignore_empty_frames, |t| {
        layers_have_keyframe_at(&layers, t)
    })
}

/// Plan the sheet for `source` without rendering anything.
pub fn plan_export<D: Document + ?Sized>(source: &D, config: &ExportConfig) -> SheetResult<SheetPlan> {
    config.validate()?;
    let selection = select_document_frames(source, config.ignore_empty_frames)?;
    plan_sheet(&selection, config.layout, config.geometry()?)
}

/// Render the animation of `source` into a single spritesheet image.
///
/// `source` is never modified: frames are rendered from a clone, which is resized and
/// padded as configured. Both the clone and the composite document are closed before
/// returning, whether the export succeeded or not.
#[tracing::instrument(
    skip_all,
    fields(output = %config.output_path.display(), layout = %config.layout)
)]
pub fn export_spritesheet<H: Host>(
    host: &mut H,
    source: &H::Doc,
    config: &ExportConfig,
) -> SheetResult<ExportReport> {
    config.validate()?;
    let geometry = config.geometry()?;
    tracing::info!(
        ignore_empty_frames = config.ignore_empty_frames,
        sprite_width = config.sprite_width,
        sprite_height = config.sprite_height,
        padding = config.padding,
        filter = %config.filter,
        start = source.time_range().start.0,
        end = source.time_range().end.0,
        "spritesheet export configured"
    );

    let mut cx = ExportContext::new();
    let result = run_export(host, source, config, geometry, &mut cx);
    cx.close_all(host);
    if let Err(e) = &result {
        tracing::error!(error = %e, "spritesheet export failed");
    }
    result
}

fn run_export<H: Host>(
    host: &mut H,
    source: &H::Doc,
    config: &ExportConfig,
    geometry: SpriteGeometry,
    cx: &mut ExportContext<H::Doc>,
) -> SheetResult<ExportReport> {
    prepare_working_copy(host, source, config, geometry, cx)?;

    let selection = select_document_frames(&*cx.working()?, config.ignore_empty_frames)?;
    tracing::info!(frames = selection.len(), "adding frames to the spritesheet");

    let plan = plan_sheet(&selection, config.layout, geometry)?;
    if plan.is_empty() {
        tracing::warn!("no frames selected; writing a single blank cell");
    }

    cx.sheet = Some(host.create_document(
        SHEET_DOCUMENT_NAME,
        plan.canvas.width,
        plan.canvas.height,
    )?);
    tracing::info!(
        columns = plan.grid.columns,
        rows = plan.grid.rows,
        width = plan.canvas.width,
        height = plan.canvas.height,
        "spritesheet document created"
    );

    let layers = render_frames(cx, &plan, geometry)?;
    position_frames(cx.sheet()?, &plan, &layers)?;
    cx.close_working(host);

    let output_path = config.resolved_output_path();
    let format = config.resolved_format();
    let sheet = cx.sheet()?;
    sheet.wait_for_done()?;
    host.export_document(sheet, &output_path, format)?;
    tracing::info!(path = %output_path.display(), "spritesheet written");

    Ok(ExportReport {
        output_path,
        format,
        plan,
    })
}

fn prepare_working_copy<H: Host>(
    host: &mut H,
    source: &H::Doc,
    config: &ExportConfig,
    geometry: SpriteGeometry,
    cx: &mut ExportContext<H::Doc>,
) -> SheetResult<()> {
    cx.working = Some(host.clone_document(source)?);
    let doc = cx.working()?;

    if doc.width() != config.sprite_width || doc.height() != config.sprite_height {
        doc.resample(config.sprite_width, config.sprite_height, config.filter)?;
        tracing::info!(width = doc.width(), height = doc.height(), "sprites resized");
    }

    if config.padding > 0 {
        let pad = i64::from(config.padding);
        doc.crop_to_visible_bounds()?;
        doc.resize_canvas(-pad, -pad, geometry.final_width(), geometry.final_height())?;
        tracing::info!(width = doc.width(), height = doc.height(), "padding applied");
    }

    if (doc.width(), doc.height()) != (geometry.final_width(), geometry.final_height()) {
        return Err(SheetError::host(format!(
            "working copy is {}x{} after preparation, expected {}x{}",
            doc.width(),
            doc.height(),
            geometry.final_width(),
            geometry.final_height()
        )));
    }
    Ok(())
}

fn render_frames<D: Document>(
    cx: &mut ExportContext<D>,
    plan: &SheetPlan,
    geometry: SpriteGeometry,
) -> SheetResult<Vec<usize>> {
    let (Some(working), Some(sheet)) = (cx.working.as_mut(), cx.sheet.as_mut()) else {
        return Err(SheetError::host("export documents are not open"));
    };
    let (w, h) = (geometry.final_width(), geometry.final_height());

    let mut layers = Vec::with_capacity(plan.frames.len());
    for frame in &plan.frames {
        working.set_current_time(frame.time)?;
        working.wait_for_done()?;
        let pixels = working.pixel_data(0, 0, w, h)?;
        layers.push(sheet.add_layer(&frame.ordinal.to_string(), pixels, w, h)?);
    }
    Ok(layers)
}

fn position_frames<D: Document>(sheet: &mut D, plan: &SheetPlan, layers: &[usize]) -> SheetResult<()> {
    for (frame, &index) in plan.frames.iter().zip(layers) {
        sheet.move_layer(index, i64::from(frame.offset.x), i64::from(frame.offset.y))?;
        tracing::debug!(
            ordinal = frame.ordinal,
            time = frame.time.0,
            x = frame.offset.x,
            y = frame.offset.y,
            "frame placed"
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/export.rs"]
mod tests;
