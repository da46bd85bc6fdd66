//! Serializes a [`GlobeFrame`] to a standalone SVG document.

use std::fmt::Write as _;

use globe::overlay::{OverlayBadge, WeatherIcon};
use globe::markers::MarkerSprite;
use globe::{GlobeFrame, Viewport};

const OCEAN_FILL: &str = "#0c0a09";
const OCEAN_STROKE: &str = "#292524";
const LAND_STOPS: [&str; 2] = ["#14532d", "#064e3b"];
const LABEL_FILL: &str = "#e7e5e4";

pub fn render_svg(frame: &GlobeFrame, viewport: Viewport) -> String {
    let mut out = String::with_capacity(16 * 1024);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="cursor:{cursor}">"#,
        w = viewport.width,
        h = viewport.height,
        cursor = frame.cursor.css(),
    );
    write_defs(&mut out);

    let ocean = frame.render.ocean;
    let _ = writeln!(
        out,
        r#"<circle class="ocean" cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{OCEAN_FILL}" stroke="{OCEAN_STROKE}"/>"#,
        ocean.center.x, ocean.center.y, ocean.radius
    );

    out.push_str("<g class=\"graticule\" fill=\"none\" stroke=\"#ffffff\" stroke-opacity=\"0.08\" stroke-width=\"0.5\">\n");
    for path in frame.render.graticule.iter().filter(|p| !p.is_empty()) {
        let _ = writeln!(out, r#"<path d="{}"/>"#, path.svg_data());
    }
    out.push_str("</g>\n");

    out.push_str("<g class=\"land\" fill=\"url(#land-fill)\" fill-rule=\"evenodd\" stroke=\"#22c55e\" stroke-opacity=\"0.3\" stroke-width=\"0.5\">\n");
    for region in &frame.render.land {
        let d: String = region
            .paths
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.svg_data())
            .collect();
        if d.is_empty() {
            continue;
        }
        match &region.key {
            Some(key) => {
                let _ = writeln!(out, r#"<path data-region="{}" d="{d}"/>"#, escape(key));
            }
            None => {
                let _ = writeln!(out, r#"<path d="{d}"/>"#);
            }
        }
    }
    out.push_str("</g>\n");

    out.push_str("<g class=\"markers\">\n");
    for sprite in &frame.markers {
        write_marker(&mut out, sprite);
    }
    out.push_str("</g>\n");

    if let Some(badge) = &frame.overlay {
        write_badge(&mut out, badge);
    }
    out.push_str("</svg>\n");
    out
}

fn write_defs(out: &mut String) {
    let _ = writeln!(
        out,
        r#"<defs><linearGradient id="land-fill" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"#,
        LAND_STOPS[0], LAND_STOPS[1]
    );
}

fn write_marker(out: &mut String, m: &MarkerSprite) {
    let (x, y) = (m.position.x, m.position.y);
    let _ = writeln!(out, r#"<g data-id="{}">"#, escape(m.id.as_str()));
    if m.glow {
        let _ = writeln!(
            out,
            r#"<circle cx="{x:.2}" cy="{y:.2}" r="{:.2}" fill="{}" fill-opacity="0.25"/>"#,
            m.radius * 2.0,
            m.color
        );
    }
    if m.pulse_ring {
        let _ = writeln!(
            out,
            r#"<circle class="pulse" cx="{x:.2}" cy="{y:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="2"/>"#,
            m.radius * 1.5,
            m.color
        );
    }
    let _ = writeln!(
        out,
        r##"<circle cx="{x:.2}" cy="{y:.2}" r="{:.2}" fill="{}" stroke="#ffffff" stroke-width="1"/>"##,
        m.radius, m.color
    );
    if let Some(label) = &m.label {
        let _ = writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" fill="{LABEL_FILL}" dominant-baseline="middle">{}</text>"#,
            label.position.x,
            label.position.y,
            label.font_px,
            escape(&label.text)
        );
    }
    out.push_str("</g>\n");
}

fn icon_glyph(icon: WeatherIcon) -> &'static str {
    match icon {
        WeatherIcon::Cloud => "\u{2601}",
        WeatherIcon::Rain => "\u{2614}",
        WeatherIcon::Sun => "\u{2600}",
        WeatherIcon::Wind => "\u{1F32C}",
    }
}

fn write_badge(out: &mut String, badge: &OverlayBadge) {
    const W: f64 = 150.0;
    const H: f64 = 44.0;
    let left = badge.anchor.x - W / 2.0;
    let top = badge.anchor.y - H;
    let _ = writeln!(
        out,
        r#"<g class="overlay" data-icon="{}">"#,
        badge.icon.name()
    );
    let _ = writeln!(
        out,
        r##"<rect x="{left:.2}" y="{top:.2}" width="{W}" height="{H}" rx="8" fill="#1c1917" fill-opacity="0.9" stroke="#facc15" stroke-opacity="0.4"/>"##
    );
    let _ = writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="13" fill="{LABEL_FILL}">{} {} {}</text>"#,
        badge.anchor.x,
        top + 18.0,
        icon_glyph(badge.icon),
        escape(&badge.temperature),
        escape(&badge.condition)
    );
    if let Some(price) = &badge.price {
        let _ = writeln!(
            out,
            r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="12" fill="#facc15">{}</text>"##,
            badge.anchor.x,
            top + 36.0,
            escape(price)
        );
    }
    out.push_str("</g>\n");
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape, render_svg};
    use crate::session::{Script, Session};
    use globe::GlobeConfig;
    use listings::demo_stalls;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("Durian King @ SS2"), "Durian King @ SS2");
        assert_eq!(escape("A & B <\"x\">"), "A &amp; B &lt;&quot;x&quot;&gt;");
    }

    #[test]
    fn document_has_backdrop_markers_and_badge() {
        let mut session = Session::new(GlobeConfig::default(), demo_stalls());
        session.run(&Script {
            select: Some("1".to_string()),
            ticks: 120,
            ..Script::default()
        });
        let cfg = session.globe.config().clone();
        let svg = render_svg(session.globe.frame(), cfg.viewport);

        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"class="ocean" cx="300.00" cy="300.00" r="250.00""#));
        assert!(svg.contains(r#"<g data-id="1">"#));
        assert!(svg.contains(r#"class="pulse""#));
        assert!(svg.contains(r#"data-icon="wind""#));
        assert!(svg.contains("31°C Tropical Sun"));
        // no landmass was supplied
        assert!(!svg.contains("data-region"));
    }
}
