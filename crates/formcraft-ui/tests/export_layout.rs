use formcraft_core::config::{CanvasConfig, Orientation};
use formcraft_core::geometry::Size;
use formcraft_core::math::Vec2;
use formcraft_ui::{FormCanvas, Widget};

fn form() -> FormCanvas {
    let mut canvas = FormCanvas::new(CanvasConfig::default());
    canvas.set_viewport(Size::new(800.0, 600.0)).unwrap();
    for i in 0..4 {
        canvas.add_widget(Widget::button(format!("Button {}", i + 1))).unwrap();
    }
    canvas
}

#[test]
fn export_is_deterministic() {
    let canvas = form();
    let first = canvas.export_layout();
    let second = canvas.export_layout();
    assert_eq!(first, second);
    assert_eq!(first.matches("Button:").count(), 4);
}

#[test]
fn export_follows_edits() {
    let mut canvas = form();
    let root = canvas.tree().root();
    let children = canvas.tree().children(root).to_vec();

    // Button 2 goes right of Button 1.
    let from = canvas.bounds(children[1]).unwrap().center();
    let target = canvas.bounds(children[0]).unwrap();
    let to = Vec2::new(target.x + target.width - 1.0, target.center().y);
    canvas.pointer_down(from).unwrap();
    canvas.pointer_move(to).unwrap();

    let mid_drag = canvas.export_layout();
    assert!(mid_drag.contains("        Destination:\n"));
    assert!(mid_drag.contains("text: 'Widget goes here'"));

    canvas.pointer_up(to).unwrap();
    let text = canvas.export_layout();

    let expected_head = "\
StackLayout:
    orientation: 'lr-tb'
    padding: [10, 10, 10, 10]
    spacing: [10, 10]
    BoxLayout:
        height: 40
        size_hint: [1, None]
        spacing: 10
        Button:
            height: 40
            size_hint: [1, None]
            text: 'Button 1'
        Button:
            height: 40
            size_hint: [1, None]
            text: 'Button 2'
    Button:
        height: 40
        size_hint: [1, None]
        text: 'Button 3'
";
    assert!(text.starts_with(expected_head), "unexpected export:\n{}", text);
    assert!(!text.contains("Destination"));
}

#[test]
fn vertical_root_header() {
    let canvas = FormCanvas::new(CanvasConfig::default().with_root_orientation(Orientation::Vertical));
    assert!(canvas
        .export_layout()
        .starts_with("BoxLayout:\n    orientation: 'vertical'\n"));
}
