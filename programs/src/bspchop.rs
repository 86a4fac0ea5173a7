use std::io::Write;

extern crate svg;
use svg::Document;
use svg::node::Node;
use svg::node::element::{Group, Path, Style};
use svg::node::element::path::Data;
extern crate termcolor;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
#[macro_use]
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

extern crate bspchop;
use bspchop::errors::{Error, Result};
use bspchop::input_buffer::InputBuffer;
use bspchop::{BareBSP, MapGeometry};

fn main() {
    env_logger::init();

    match run() {
        Ok(()) => {}
        Err(err) => {
            drop(write_err(err));
            std::process::exit(1);
        }
    }
}

fn color_choice(arg: Option<&str>) -> ColorChoice {
    match arg {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn write_err(err: Error) -> Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(&mut stderr, "error: ")?;
    stderr.set_color(&ColorSpec::new())?;
    writeln!(&mut stderr, "{}", err)?;
    if err.kind().is_format_error() {
        writeln!(&mut stderr, "(this doesn't look like a usable VBSP file)")?;
    }
    if let Some(backtrace) = err.backtrace() {
        writeln!(&mut stderr, "{:?}", backtrace)?;
    }
    Ok(())
}

fn run() -> Result<()> {
    let args = clap_app!(bspchop =>
        (about: "Inspect and render Source engine BSP maps")
        (@arg color: -c --color +takes_value "Choose whether to use colored output (always, never, auto)")
        (@arg file: +required "Input BSP file, or - for stdin")
        (@subcommand info =>
            (about: "Print a summary of a map's geometry")
            (@arg verbose: -v --verbose "Also print the lump directory")
        )
        (@subcommand chart =>
            (about: "Render an SVG of a map's faces, seen from above")
            (@arg outfile: +required "Output file")
        )
    ).get_matches();

    // clap enforces `file`, so this is always present
    let filename = args.value_of("file").unwrap_or("-");
    let input = match filename {
        "-" => InputBuffer::new_from_stdin()?,
        f => InputBuffer::new_from_file(f)?,
    };

    let bsp = bspchop::parse_bare_bsp(input.bytes())?;
    let geometry = bsp.decode_geometry()?;
    let map = MapGeometry::from_bare(&geometry, bsp.header.version, bsp.header.map_revision)?;

    match args.subcommand() {
        ("info", Some(subargs)) => { do_info(&args, subargs, &bsp, &map)? },
        ("chart", Some(subargs)) => { do_chart(subargs, &map)? },
        _ => {
            eprintln!("{}", args.usage());
        }
    }

    Ok(())
}

fn do_info(args: &clap::ArgMatches, subargs: &clap::ArgMatches, bsp: &BareBSP, map: &MapGeometry) -> Result<()> {
    let mut stdout = StandardStream::stdout(color_choice(args.value_of("color")));
    let mut heading = ColorSpec::new();
    heading.set_fg(Some(Color::Cyan)).set_bold(true);

    stdout.set_color(&heading)?;
    writeln!(&mut stdout, "VBSP version {}, map revision {}", map.version, map.map_revision)?;
    stdout.reset()?;
    writeln!(&mut stdout, "{} vertices, {} faces, {} indices", map.vertices().len(), map.faces().len(), map.index_count())?;
    match map.bounds() {
        Some(bounds) => writeln!(
            &mut stdout, "bounds: ({}, {}, {}) to ({}, {}, {})",
            bounds.mins.x, bounds.mins.y, bounds.mins.z,
            bounds.maxs.x, bounds.maxs.y, bounds.maxs.z,
        )?,
        None => writeln!(&mut stdout, "bounds: none")?,
    }

    if ! subargs.is_present("verbose") {
        return Ok(());
    }

    writeln!(&mut stdout)?;
    stdout.set_color(&heading)?;
    writeln!(&mut stdout, "{:>2}  {:<28} {:>10} {:>10} {:>4}", "#", "lump", "offset", "size", "ver")?;
    stdout.reset()?;
    for (lump, descriptor) in bsp.iter_lumps() {
        if descriptor.size == 0 {
            continue;
        }
        let mut name = lump.name().to_string();
        if ! lump.aliases().is_empty() {
            name.push_str(&format!(" ({})", lump.aliases().join(", ")));
        }
        if lump.is_decoded() {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        }
        writeln!(
            &mut stdout, "{:>2}  {:<28} {:>10} {:>10} {:>4}",
            lump.index(), name, descriptor.offset, descriptor.size, descriptor.version,
        )?;
        stdout.reset()?;
    }

    Ok(())
}

fn do_chart(subargs: &clap::ArgMatches, map: &MapGeometry) -> Result<()> {
    let doc = map_as_svg(map);
    let outfile = subargs.value_of("outfile").unwrap_or("bspchop.svg");
    svg::save(outfile, &doc)?;
    debug!("wrote {} faces to {}", map.faces().len(), outfile);
    Ok(())
}

fn map_as_svg(map: &MapGeometry) -> Document {
    let mut group = Group::new();

    for face in map.faces() {
        let outline = face.outline();
        let (first, others) = match outline.split_first() {
            Some(split) => split,
            None => continue,
        };

        let vertices = map.vertices();
        let start = vertices[*first as usize];
        let mut data = Data::new().move_to((start.x, start.y));
        for &v in others {
            let vertex = vertices[v as usize];
            data = data.line_to((vertex.x, vertex.y));
        }
        data = data.close();

        let mut path = Path::new().set("d", data);
        path.assign("data-face", face.face().to_string());
        if outline.len() < 3 {
            path.assign("class", "face degenerate");
        }
        else {
            path.assign("class", "face");
        }
        group.append(path);
    }

    // Source's y-axis points up, but SVG's points down, so flip the whole group.  Height is
    // dropped entirely; this is a top-down view.
    group.assign("transform", "scale(1 -1)");
    let viewbox = match map.bounds() {
        Some(bounds) => (
            bounds.mins.x, -bounds.maxs.y,
            bounds.maxs.x - bounds.mins.x, bounds.maxs.y - bounds.mins.y,
        ),
        None => (0.0, 0.0, 0.0, 0.0),
    };
    Document::new()
        .set("viewBox", viewbox)
        .add(Style::new(include_str!("map-svg.css")))
        .add(group)
}
