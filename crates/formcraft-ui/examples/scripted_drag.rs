//! Builds a small form and rearranges it with scripted pointer events.
//!
//! Run with `RUST_LOG=formcraft_ui=trace` to see every tree edit.

use formcraft_core::config::{CanvasConfig, Orientation};
use formcraft_core::geometry::Size;
use formcraft_core::logging;
use formcraft_core::math::Vec2;
use formcraft_core::profiling::{new_frame, set_enabled};
use formcraft_ui::{FormCanvas, NodeId, Widget};

fn band(canvas: &FormCanvas, id: NodeId, fx: f32, fy: f32) -> Option<Vec2> {
    let bounds = canvas.bounds(id)?;
    Some(bounds.position() + bounds.size().as_vec2() * Vec2::new(fx, fy))
}

fn drag(canvas: &mut FormCanvas, from: Vec2, to: Vec2) -> Result<(), Box<dyn std::error::Error>> {
    new_frame();
    canvas.pointer_down(from)?;
    new_frame();
    canvas.pointer_move(to)?;
    new_frame();
    canvas.pointer_up(to)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    set_enabled(true);

    let config = CanvasConfig::default().with_root_orientation(Orientation::Flow);
    let mut canvas = FormCanvas::new(config);
    canvas.set_viewport(Size::new(800.0, 600.0))?;

    let name_label = canvas.add_widget(Widget::label("Name"))?;
    let name_input = canvas.add_widget(Widget::text_input())?;
    let subscribe = canvas.add_widget(Widget::check_box())?;
    let submit = canvas.add_widget(Widget::button("Submit"))?;

    // Put the input to the right of its label.
    let from = band(&canvas, name_input, 0.5, 0.5).ok_or("input not laid out")?;
    let to = band(&canvas, name_label, 0.9, 0.5).ok_or("label not laid out")?;
    drag(&mut canvas, from, to)?;

    // Move the submit button above the checkbox.
    let from = band(&canvas, submit, 0.5, 0.5).ok_or("button not laid out")?;
    let to = band(&canvas, subscribe, 0.5, 0.75).ok_or("checkbox not laid out")?;
    drag(&mut canvas, from, to)?;

    canvas.validate()?;
    println!("{}", canvas.export_layout());
    Ok(())
}
