use widgetry::{Line, Text};

use model::Marker;

pub fn marker(marker: &Marker) -> Text {
    let mut lines = marker.callout().into_iter();
    let mut txt = Text::new();
    if let Some(heading) = lines.next() {
        txt.add_line(Line(heading).small_heading());
    }
    for line in lines {
        txt.add_line(Line(line));
    }
    txt
}

pub fn journey_start() -> Text {
    let mut txt = Text::from(Line("Starting Point").small_heading());
    txt.add_line(Line("Journey Start"));
    txt
}
