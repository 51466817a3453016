//! Glaze command line
//!
//! Styles one widget node from a CSS theme, then either prints the computed
//! style or paints the widget's chrome into a PNG.
//!
//! - glaze theme.css --node "window button.flat"          # computed style
//! - glaze theme.css --node check --state checked --widget check -o out.png

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use glaze_common::settings::Settings;
use glaze_common::warning::recorded_warnings;
use glaze_css::paint::background::paint_background;
use glaze_css::paint::border::paint_border;
use glaze_css::paint::render::{
    render_activity, render_arrow, render_check, render_expander, render_focus, render_handle, render_layout,
    render_option,
};
use glaze_css::selector::pseudo_class_state;
use glaze_css::{
    ComputedStyle, CornerMaskCache, CssProvider, JunctionSides, PropertyId, Resolver, Rgba, SideFlags, StateFlags,
    StyleNode, parse_text,
};
use glaze_raster::{FileImageLoader, FontLayout, PixmapCanvas, load_font, system_font};
use owo_colors::OwoColorize;

/// Glaze: resolve CSS theme styles for widget nodes and render their chrome
#[derive(Parser, Debug)]
#[command(name = "glaze")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the computed style of a button inside a window
    glaze theme.css --node "window button.flat#ok"

    # The same style as JSON, limited to two properties
    glaze theme.css --node "window button" --json -p color -p border-top-width

    # Render a checked, hovered check box at 2x
    glaze theme.css --node check --state checked,hover --widget check -o check.png --scale 2

    # Render a labelled button with its text shadow
    glaze theme.css --node button --text "OK" --width 80 --height 32 -o button.png
"#)]
struct Cli {
    /// Path to the CSS theme
    #[arg(value_name = "STYLESHEET")]
    stylesheet: PathBuf,

    /// Node path from the root, space separated, each `name[.class…][#id]`
    #[arg(short, long, default_value = "box", value_name = "PATH")]
    node: String,

    /// Comma separated pseudo-class states of the last node (hover, checked, rtl, …)
    #[arg(short, long, value_delimiter = ',', value_name = "STATES")]
    state: Vec<String>,

    /// JSON file with display settings (`dpi`, `font_size`)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Print the computed style as JSON
    #[arg(long)]
    json: bool,

    /// Only print these properties (repeatable)
    #[arg(short, long = "property", value_name = "NAME")]
    properties: Vec<String>,

    /// Render the widget and save it to this PNG file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Widget chrome to render
    #[arg(short, long, value_enum, default_value_t = Widget::Box)]
    widget: Widget,

    /// Widget width in pixels
    #[arg(long, default_value = "64")]
    width: u32,

    /// Widget height in pixels
    #[arg(long, default_value = "32")]
    height: u32,

    /// Transparent space around the widget, for shadows and outlines
    #[arg(long, default_value = "8")]
    margin: u32,

    /// Device pixels per CSS pixel
    #[arg(long, default_value = "1")]
    scale: f64,

    /// Direction of `--widget arrow`, in degrees clockwise from up
    #[arg(long, default_value = "0")]
    angle: f64,

    /// Fill the image with this color before painting
    #[arg(long, value_name = "COLOR")]
    background: Option<String>,

    /// Text to paint centered on the widget
    #[arg(long)]
    text: Option<String>,

    /// Font file for `--text`; a system font is used otherwise
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,
}

/// The chrome painted by `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Widget {
    /// Background and border only
    Box,
    /// A check box
    Check,
    /// A radio button
    Radio,
    /// An arrow icon
    Arrow,
    /// A disclosure triangle
    Expander,
    /// A busy spinner
    Spinner,
    /// A drag handle
    Handle,
    /// A focus ring
    Focus,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let css = fs::read_to_string(&cli.stylesheet)
        .with_context(|| format!("failed to read stylesheet '{}'", cli.stylesheet.display()))?;
    let base = cli
        .stylesheet
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut provider = CssProvider::from_data(&css);
    provider.set_image_loader(Box::new(FileImageLoader::new(base)));

    let mut resolver = Resolver::new(provider);
    if let Some(ref path) = cli.settings {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings '{}'", path.display()))?;
        let settings = Settings::from_json(&text).with_context(|| format!("in '{}'", path.display()))?;
        resolver.set_settings(settings);
    }

    let node = build_node(&cli.node, &cli.state)?;
    let style = resolver.style_for(&node);
    let properties = property_filter(&cli.properties)?;

    if let Some(ref output) = cli.output {
        let canvas = render_widget(&cli, &style, &node)?;
        canvas
            .pixmap()
            .save_png(output)
            .with_context(|| format!("failed to write '{}'", output.display()))?;
        println!("Rendered to: {}", output.display());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&style_json(&style, &properties))?);
    } else if cli.output.is_none() {
        print_style(&style, &properties);
    }

    let warnings = recorded_warnings();
    if !warnings.is_empty() {
        eprintln!(
            "{} {} declaration(s) or resource(s) skipped",
            "warning:".yellow().bold(),
            warnings.len()
        );
    }
    Ok(())
}

/// One segment of a node path.
#[derive(Debug, Default, PartialEq, Eq)]
struct NodeSpec {
    name: String,
    id: Option<String>,
    classes: Vec<String>,
}

/// Parse `name[.class…][#id]`; classes and the id may come in any order.
fn parse_segment(segment: &str) -> anyhow::Result<NodeSpec> {
    let end = segment.find(['.', '#']).unwrap_or(segment.len());
    let (name, mut rest) = segment.split_at(end);
    if name.is_empty() {
        bail!("node '{segment}' has no name");
    }
    let mut spec = NodeSpec {
        name: name.to_owned(),
        ..NodeSpec::default()
    };
    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['.', '#']).unwrap_or(body.len());
        let (word, tail) = body.split_at(end);
        if word.is_empty() {
            bail!("empty '{marker}' in node '{segment}'");
        }
        if marker == '#' {
            if spec.id.replace(word.to_owned()).is_some() {
                bail!("node '{segment}' has more than one id");
            }
        } else {
            spec.classes.push(word.to_owned());
        }
        rest = tail;
    }
    Ok(spec)
}

/// Map state names to flags. `ltr` and `rtl` set the text direction.
fn parse_states(names: &[String]) -> anyhow::Result<StateFlags> {
    names
        .iter()
        .map(|name| name.as_str().trim())
        .filter(|name| !name.is_empty())
        .try_fold(StateFlags::empty(), |state, name| {
            let flag = match name.to_ascii_lowercase().as_str() {
                "ltr" => Some(StateFlags::DIR_LTR),
                "rtl" => Some(StateFlags::DIR_RTL),
                _ => pseudo_class_state(name),
            };
            flag.map(|flag| state | flag)
                .with_context(|| format!("unknown state '{name}'"))
        })
}

/// Build the node chain for `path` and return its last node.
fn build_node(path: &str, states: &[String]) -> anyhow::Result<Rc<StyleNode>> {
    let mut node: Option<Rc<StyleNode>> = None;
    for segment in path.split_whitespace() {
        let spec = parse_segment(segment)?;
        let child = match (&spec.id, &node) {
            (Some(id), parent) => StyleNode::with_id(&spec.name, id, parent.as_ref()),
            (None, Some(parent)) => StyleNode::with_parent(&spec.name, parent),
            (None, None) => StyleNode::new(&spec.name),
        };
        for class in &spec.classes {
            let _ = child.add_class(class);
        }
        node = Some(child);
    }
    let node = node.context("empty node path")?;
    node.set_state(parse_states(states)?);
    Ok(node)
}

/// Resolve `--property` names; an empty list selects everything.
fn property_filter(names: &[String]) -> anyhow::Result<Vec<PropertyId>> {
    names
        .iter()
        .map(|name| PropertyId::from_name(name).with_context(|| format!("unknown property '{name}'")))
        .collect()
}

fn selected<'a>(
    style: &'a ComputedStyle,
    properties: &'a [PropertyId],
) -> impl Iterator<Item = (PropertyId, String)> + 'a {
    style
        .iter()
        .filter(|(property, _)| properties.is_empty() || properties.contains(property))
        .map(|(property, value)| (property, value.to_string()))
}

fn style_json(style: &ComputedStyle, properties: &[PropertyId]) -> serde_json::Value {
    serde_json::Value::Object(
        selected(style, properties)
            .map(|(property, value)| (property.name().to_owned(), serde_json::Value::String(value)))
            .collect(),
    )
}

fn print_style(style: &ComputedStyle, properties: &[PropertyId]) {
    for (property, value) in selected(style, properties) {
        println!("{}: {value};", property.name().cyan());
    }
}

/// Paint the chosen widget into a fresh canvas.
fn render_widget(cli: &Cli, style: &ComputedStyle, node: &StyleNode) -> anyhow::Result<PixmapCanvas> {
    if !(cli.scale.is_finite() && cli.scale > 0.0) {
        bail!("--scale must be positive, got {}", cli.scale);
    }
    let margin = f64::from(cli.margin);
    let (x, y) = (margin, margin);
    let (width, height) = (f64::from(cli.width), f64::from(cli.height));
    let device_width = ((width + 2.0 * margin) * cli.scale).ceil() as u32;
    let device_height = ((height + 2.0 * margin) * cli.scale).ceil() as u32;
    let mut canvas = PixmapCanvas::new(device_width, device_height)
        .context("image size must be positive")?
        .with_device_scale(cli.scale, cli.scale);

    if let Some(ref color) = cli.background {
        let color = parse_text(color, Rgba::parse).with_context(|| format!("invalid --background '{color}'"))?;
        canvas.clear(color);
    }

    let mut cache = CornerMaskCache::new();
    if cli.widget == Widget::Handle {
        render_handle(style, node, &mut canvas, x, y, width, height, JunctionSides::empty(), &mut cache);
    } else {
        paint_background(style, &mut canvas, x, y, width, height, JunctionSides::empty(), &mut cache);
        paint_border(style, &mut canvas, x, y, width, height, SideFlags::empty(), JunctionSides::empty());
    }

    match cli.widget {
        Widget::Box | Widget::Handle => {}
        Widget::Check => render_check(style, node, &mut canvas, x, y, width, height),
        Widget::Radio => render_option(style, node, &mut canvas, x, y, width, height),
        Widget::Expander => render_expander(style, node, &mut canvas, x, y, width, height),
        Widget::Spinner => render_activity(style, &mut canvas, x, y, width, height),
        Widget::Focus => render_focus(style, &mut canvas, x, y, width, height),
        Widget::Arrow => {
            let size = width.min(height);
            render_arrow(
                style,
                &mut canvas,
                cli.angle.to_radians(),
                x + (width - size) / 2.0,
                y + (height - size) / 2.0,
                size,
            );
        }
    }

    if let Some(ref text) = cli.text {
        let font = match cli.font {
            Some(ref path) => load_font(path).with_context(|| format!("failed to load font '{}'", path.display()))?,
            None => system_font().context("no system font found, pass --font")?,
        };
        let layout = FontLayout::new(Rc::new(font), text, style.font_size());
        let (text_width, text_height) = layout.logical_size();
        render_layout(
            style,
            &mut canvas,
            x + (width - text_width) / 2.0,
            y + (height - text_height) / 2.0,
            &layout,
        );
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_parse_segment() {
        let spec = parse_segment("button.flat#ok.suggested").unwrap();
        assert_eq!(spec.name, "button");
        assert_eq!(spec.id.as_deref(), Some("ok"));
        assert_eq!(spec.classes, ["flat", "suggested"]);

        assert_eq!(parse_segment("label").unwrap().classes, Vec::<String>::new());
        assert!(parse_segment(".flat").is_err());
        assert!(parse_segment("button.").is_err());
        assert!(parse_segment("button#a#b").is_err());
    }

    #[test]
    fn test_build_node_chain() {
        let node = build_node("window  box.vertical button#ok.flat", &states(&["hover", "checked"])).unwrap();
        assert_eq!(node.name(), "button");
        assert_eq!(node.id(), Some("ok"));
        assert!(node.has_class("flat"));
        assert_eq!(node.state(), StateFlags::PRELIGHT | StateFlags::CHECKED);

        let parent = node.parent().unwrap();
        assert_eq!(parent.name(), "box");
        assert!(parent.has_class("vertical"));
        assert_eq!(parent.parent().unwrap().name(), "window");
        assert!(build_node("   ", &[]).is_err());
    }

    #[test]
    fn test_states() {
        assert_eq!(parse_states(&states(&["rtl", " disabled"])).unwrap(), StateFlags::DIR_RTL | StateFlags::INSENSITIVE);
        assert_eq!(parse_states(&[]).unwrap(), StateFlags::empty());
        assert!(parse_states(&states(&["sleepy"])).is_err());
    }

    #[test]
    fn test_json_output_uses_property_names() {
        let style = Resolver::new(CssProvider::from_data("button { color: #ff0000; }"))
            .style_for(&build_node("button", &[]).unwrap());
        let filter = property_filter(&states(&["color"])).unwrap();
        let json = style_json(&style, &filter);
        assert_eq!(json["color"], "rgba(255,0,0,1)");
        assert_eq!(json.as_object().unwrap().len(), 1);

        let all = style_json(&style, &[]);
        assert!(all.get("background-color").is_some());
        assert!(property_filter(&states(&["colour"])).is_err());
    }
}
