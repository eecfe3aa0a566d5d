use crate::TemplateEditorApp;
use crate::input::route_event;
use crate::renderer::{PageBackdrop, hover_cursor};

pub fn central_panel(app: &mut TemplateEditorApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::canvas(&ctx.style()))
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;
            let (time, modifiers) = ctx.input(|input| (input.time, input.modifiers));

            let leeway = app.editor.config().pan_leeway;
            let page_size = app.editor.page().size();
            app.editor.viewport_mut().clamp(canvas_rect.size(), page_size, leeway);
            app.editor.tick(time, modifiers);

            for event in app.input.process_input(ctx, canvas_rect, response.hovered()) {
                // zoom and page changes earlier in the frame move the page
                let layout = app.editor.viewport().layout(canvas_rect, app.editor.page().size());
                if let Some(action) = route_event(&event, &mut app.editor, &layout, time) {
                    app.handle_action(ctx, action);
                }
            }

            let page_index = app.editor.page_index();
            let page_size = app.editor.page().size();
            let layout = app.editor.viewport().layout(canvas_rect, page_size);
            if let Some(icon) = response.hover_pos().and_then(|pos| hover_cursor(&layout, &app.editor, pos)) {
                ctx.set_cursor_icon(icon);
            }

            let key = app.pages.key(page_index);
            let backdrop = app
                .pages
                .load(page_index, page_size)
                .map(|image| PageBackdrop { key: &key, image });
            app.renderer.render(ctx, &painter, &layout, &app.editor, backdrop, &app.assets);
        });

    if app.editor.arrow_repeat.held_key().is_some() || !app.editor.state().is_idle() {
        ctx.request_repaint();
    }
}
