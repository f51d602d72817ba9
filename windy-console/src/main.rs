//! Line-oriented console that drives a `MapView` against a web context
//! which prints every script instead of running it. Query results and
//! inbound envelopes are typed in by hand, which makes it handy for poking
//! at the bridge without a browser.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self, BufRead, Write},
    path::Path,
    rc::Rc,
};
use windy_bridge::{
    constants::DEFAULT_CHANNEL_NAME, Annotation, AnnotationView, Coordinate, IconDescriptor,
    MapObserver, MapView, ScriptCompletion, ViewportState, WebContext,
};

/// Prints what the bridge asks of it and queues query completions
#[derive(Clone, Default)]
struct EchoContext {
    pending: Rc<RefCell<VecDeque<ScriptCompletion>>>,
}

impl WebContext for EchoContext {
    fn load_document(&mut self, document: &Path) {
        println!("[load] {}", document.display());
    }

    fn evaluate_script(&mut self, script: &str, completion: Option<ScriptCompletion>) {
        println!("[eval]\n{}", script);
        if let Some(completion) = completion {
            self.pending.borrow_mut().push_back(completion);
            println!("[eval] awaiting answer ({} pending)", self.pending.borrow().len());
        }
    }
}

struct EchoObserver;

impl MapObserver for EchoObserver {
    fn did_initialize(&mut self, state: &ViewportState) {
        println!("[hook] did_initialize {:?}", state.bounds);
    }

    fn zoom_did_start(&mut self, _state: &ViewportState) {
        println!("[hook] zoom_did_start");
    }

    fn zoom_did_end(&mut self, _state: &ViewportState) {
        println!("[hook] zoom_did_end");
    }

    fn move_did_start(&mut self, _state: &ViewportState) {
        println!("[hook] move_did_start");
    }

    fn move_did_end(&mut self, state: &ViewportState) {
        println!("[hook] move_did_end {:?}", state.bounds);
    }

    fn view_for(&mut self, annotation: &Annotation) -> Option<AnnotationView> {
        Some(AnnotationView::new(annotation.clone()))
    }

    fn did_select(&mut self, view: &AnnotationView) {
        println!("[hook] did_select {}", view.id());
    }
}

struct Console {
    map: MapView,
    context: EchoContext,
    annotations: Vec<Annotation>,
}

impl Console {
    fn new() -> Self {
        let context = EchoContext::default();
        let map = MapView::builder(context.clone())
            .with_observer(EchoObserver)
            .build();
        Self {
            map,
            context,
            annotations: Vec::new(),
        }
    }

    /// Runs one command line. Returns `false` on `quit`.
    fn execute(&mut self, line: &str) -> Result<bool> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(true);
        };
        let args: Vec<&str> = words.collect();

        match command {
            "init" => self.map.initialize_with_key(arg(&args, 0)?),
            "loaded" => self.map.did_finish_navigation(),
            "pan" => self.map.pan_to(coordinate(&args, 0)?, None),
            "zoom" => self.map.set_zoom(number(&args, 0)?, None),
            "min" => self.map.set_min_zoom(number(&args, 0)?),
            "max" => self.map.set_max_zoom(number(&args, 0)?),
            "fit" => {
                let coordinates = (0..args.len() / 2)
                    .map(|i| coordinate(&args, i * 2))
                    .collect::<Result<Vec<_>>>()?;
                self.map.fit_bounds(&coordinates);
            }
            "add" => {
                let icon = args.get(2).copied().unwrap_or("marker.png");
                let annotation =
                    Annotation::new(coordinate(&args, 0)?, IconDescriptor::url(icon));
                println!("[add] {}", annotation.id());
                self.map.add_annotation(&annotation);
                self.annotations.push(annotation);
            }
            "remove" => {
                let index: usize = number(&args, 0)?;
                if index >= self.annotations.len() {
                    bail!("no annotation #{}", index);
                }
                let annotation = self.annotations.remove(index);
                self.map.remove_annotation(&annotation);
            }
            "list" => {
                for (index, annotation) in self.annotations.iter().enumerate() {
                    let on_map = self.map.annotation_view(&annotation.id()).is_some();
                    println!(
                        "#{} {} {:?} on map: {}",
                        index,
                        annotation.id(),
                        annotation.coordinate,
                        on_map
                    );
                }
            }
            "center" => self
                .map
                .get_center(|center| println!("[result] center {:?}", center)),
            "getzoom" => self
                .map
                .get_zoom(|zoom| println!("[result] zoom {:?}", zoom)),
            "convert" => {
                let index: usize = number(&args, 0)?;
                let annotation = self
                    .annotations
                    .get(index)
                    .ok_or_else(|| anyhow!("no annotation #{}", index))?;
                self.map
                    .convert(annotation, |point| println!("[result] point {:?}", point));
            }
            "answer" => {
                let value = json_rest(line, command)?;
                let completion = self
                    .context
                    .pending
                    .borrow_mut()
                    .pop_front()
                    .ok_or_else(|| anyhow!("no query is waiting for an answer"))?;
                completion(Some(value));
            }
            "event" => {
                let envelope = json_rest(line, command)?;
                match self.map.receive_message(DEFAULT_CHANNEL_NAME, &envelope) {
                    Some(event) => println!("[event] {:?}", event.name()),
                    None => println!("[event] dropped"),
                }
            }
            "logo" => self.map.set_logo_visible(arg(&args, 0)? == "on"),
            "state" => println!(
                "zooming: {} moving: {} bounds: {:?}",
                self.map.is_zooming(),
                self.map.is_moving(),
                self.map.viewport().bounds
            ),
            "help" => print_help(),
            "quit" | "exit" => return Ok(false),
            other => bail!("unknown command {:?}, try help", other),
        }
        Ok(true)
    }
}

fn arg<'a>(args: &[&'a str], index: usize) -> Result<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| anyhow!("missing argument #{}", index + 1))
}

fn number<T>(args: &[&str], index: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = arg(args, index)?;
    raw.parse()
        .with_context(|| format!("{:?} is not a number", raw))
}

fn coordinate(args: &[&str], index: usize) -> Result<Coordinate> {
    let coordinate = Coordinate::new(number(args, index)?, number(args, index + 1)?);
    if !coordinate.is_valid() {
        bail!("{:?} is out of range", coordinate);
    }
    Ok(coordinate)
}

fn json_rest(line: &str, command: &str) -> Result<Value> {
    let rest = line.trim_start()[command.len()..].trim();
    serde_json::from_str(rest).with_context(|| format!("invalid JSON: {}", rest))
}

fn print_help() {
    println!(
        "\
init <key>              load a document for the API key
loaded                  report that the document finished loading
pan <lat> <lng>         pan the map
zoom|min|max <level>    set zoom, minimum or maximum zoom
fit <lat> <lng> ...     fit the view to coordinates
add <lat> <lng> [icon]  add an annotation
remove <n>              remove annotation #n
list                    list annotations
center | getzoom        query the map
convert <n>             container point of annotation #n
answer <json>           answer the oldest pending query
event <json>            deliver an envelope on the map channel
logo on|off             toggle the Windy logo
state                   print viewport state
quit"
    );
}

fn main() -> Result<()> {
    windy_bridge::init_logging();

    let mut console = Console::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("windy> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match console.execute(&line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => log::error!("{:#}", e),
        }
    }
    Ok(())
}
