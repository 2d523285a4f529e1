use eframe::egui::{Color32, Label, Pos2, Rect, RichText, Rounding, Sense, Shape, Stroke, Ui, Vec2};

use crate::display::{BatteryLevel, SignalLevel, Status};
use crate::graph::Graph;


const ICON_SIZE: Vec2 = Vec2::new(36.0, 24.0);
const ACTIVE: Color32 = Color32::WHITE;
const INACTIVE: Color32 = Color32::from_gray(70);
const BATTERY_LOW: Color32 = Color32::RED;


pub fn get_phrase_label(phrase: &str) -> Label {
    let text = RichText::new(phrase)
        .color(Color32::LIGHT_GRAY)
        .size(22.0);

    Label::new(text)
}

pub fn get_value_label(value: &str) -> Label {
    let text = RichText::new(value)
        .color(Color32::WHITE)
        .size(30.0);

    Label::new(text)
}

pub fn get_small_label(value: &str) -> Label {
    let text = RichText::new(value)
        .color(Color32::WHITE)
        .size(16.0);

    Label::new(text)
}

pub fn get_status_label(status: &Status) -> Label {
    let color = match status {
        Status::Connected(_) => Color32::GREEN,
        Status::Disconnected => Color32::RED,
        Status::Idle | Status::Scanning => Color32::YELLOW,
    };
    let text = RichText::new(status.text())
        .color(color)
        .size(14.0);

    Label::new(text)
}


/// Four rising bars, `level.0` of them lit.
pub fn signal_icon(ui: &mut Ui, level: SignalLevel) {
    let (rect, _) = ui.allocate_exact_size(ICON_SIZE, Sense::hover());
    let painter = ui.painter_at(rect);

    let gap = 3.0;
    let bar_width = (rect.width() - gap * (SignalLevel::MAX - 1) as f32) / SignalLevel::MAX as f32;

    for i in 0..SignalLevel::MAX {
        let height = rect.height() * (i + 1) as f32 / SignalLevel::MAX as f32;
        let left = rect.left() + i as f32 * (bar_width + gap);
        let bar = Rect::from_min_max(
            Pos2::new(left, rect.bottom() - height),
            Pos2::new(left + bar_width, rect.bottom()),
        );
        let color = if i < level.0 { ACTIVE } else { INACTIVE };
        painter.rect_filled(bar, Rounding::same(1.0), color);
    }
}

/// Battery outline with `level.0` filled segments.
pub fn battery_icon(ui: &mut Ui, level: BatteryLevel) {
    let (rect, _) = ui.allocate_exact_size(ICON_SIZE, Sense::hover());
    let painter = ui.painter_at(rect);

    let tip_width = 3.0;
    let body = Rect::from_min_max(rect.min, Pos2::new(rect.right() - tip_width, rect.bottom()));
    let tip = Rect::from_min_max(
        Pos2::new(body.right(), rect.center().y - 4.0),
        Pos2::new(rect.right(), rect.center().y + 4.0),
    );
    painter.rect_stroke(body, Rounding::same(2.0), Stroke::new(1.5, ACTIVE));
    painter.rect_filled(tip, Rounding::ZERO, ACTIVE);

    let fill = if level.0 == 0 { BATTERY_LOW } else { ACTIVE };
    let inner = body.shrink(3.0);
    let segment_width = inner.width() / BatteryLevel::MAX as f32;

    if level.0 == 0 {
        let sliver = Rect::from_min_size(inner.min, Vec2::new(segment_width * 0.3, inner.height()));
        painter.rect_filled(sliver, Rounding::ZERO, fill);
        return;
    }
    for i in 0..level.0 {
        let left = inner.left() + i as f32 * segment_width;
        let segment = Rect::from_min_max(
            Pos2::new(left + 0.5, inner.top()),
            Pos2::new(left + segment_width - 0.5, inner.bottom()),
        );
        painter.rect_filled(segment, Rounding::ZERO, fill);
    }
}


pub fn graph_view(ui: &mut Ui, graph: &Graph, height: f32) {
    let size = Vec2::new(ui.available_width(), height);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, Rounding::same(4.0), Color32::from_gray(20));

    let points = graph.points(rect.shrink(6.0));
    if points.len() > 1 {
        painter.add(Shape::line(points, Stroke::new(1.5, graph.color)));
    }
}

pub fn graph_title(ui: &mut Ui, title: &str) {
    ui.add(Label::new(RichText::new(title).color(Color32::GRAY).size(14.0)));
}
