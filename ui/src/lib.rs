#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod components;
mod map_view;

use anyhow::Result;
use geom::{Bounds, Duration};
use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use widgetry::{Canvas, Color, EventCtx, GfxCtx, Settings, SharedAppState};

use model::{FileSource, Model, VehicleName, VehicleSource};

#[derive(StructOpt)]
struct Args {
    /// The path to a JSON vehicle feed. It's re-read whenever the file changes.
    #[structopt(long)]
    feed: Option<String>,
    /// The path to a CSV file with one location update per row
    #[structopt(long)]
    csv: Option<String>,
    /// How many minutes of history to draw for the selected vehicle
    #[structopt(long, default_value = "30")]
    window_minutes: i64,
    /// How often to check the feed for changes
    #[structopt(long, default_value = "10")]
    poll_seconds: f64,
}

impl Args {
    // TODO These args only make sense on native, because they read files
    fn load(&mut self) -> Result<(Model, Option<Box<dyn VehicleSource>>)> {
        if self.feed.is_some() && self.csv.is_some() {
            bail!("You can't specify both --feed and --csv");
        }
        model::window_from_minutes(self.window_minutes)?;
        let path = match self.feed.take().or_else(|| self.csv.take()) {
            Some(path) => path,
            None => {
                return Ok((Model::empty(), None));
            }
        };
        let mut source = FileSource::new(path);
        let model = source.load()?;
        let source: Box<dyn VehicleSource> = Box::new(source);
        Ok((model, Some(source)))
    }
}

fn run(settings: Settings) {
    abstutil::logger::setup();

    let mut args = Args::from_iter(abstutil::cli_args());

    widgetry::run(settings, move |ctx| {
        let (model, source) = match ctx.loading_screen("load vehicles", |_, _| args.load()) {
            Ok(pair) => pair,
            Err(err) => {
                error!("Couldn't load vehicles: {err}");
                (Model::empty(), None)
            }
        };

        let mut app = App::new(ctx, model);
        app.source = source;
        // A bad --window-minutes already failed the load above
        app.window = model::window_from_minutes(args.window_minutes)
            .unwrap_or_else(|_| model::default_window());
        app.poll_every = Duration::seconds(args.poll_seconds);
        app.restore_savestate(ctx);

        let states = vec![map_view::MapView::new_state(ctx, &app)];
        (app, states)
    });
}

pub fn main() {
    let settings = Settings::new("Vehicle Tracker");
    run(settings);
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_wasm() {
    run(Settings::new("Vehicle Tracker").root_dom_element_id("loading".to_string()));
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = window)]
    fn sync_mapbox_canvas(lon1: f64, lat1: f64, lon2: f64, lat2: f64);
}

pub struct App {
    model: Model,
    // None when the model came from a one-off file picked at runtime
    source: Option<Box<dyn VehicleSource>>,

    /// The currently selected vehicle. Set through `select`.
    selected: Option<VehicleName>,
    window: chrono::Duration,
    poll_every: Duration,

    // Avoid syncing when bounds match
    #[allow(unused)]
    mapbox_bounds: Bounds,
}

impl SharedAppState for App {
    fn draw_default(&self, g: &mut GfxCtx) {
        if cfg!(not(target_arch = "wasm32")) {
            g.clear(Color::BLACK);
        }
    }

    fn before_quit(&self, canvas: &Canvas) {
        let ss = Savestate {
            cam_x: canvas.cam_x,
            cam_y: canvas.cam_y,
            cam_zoom: canvas.cam_zoom,
            selected: self.selected.clone(),
        };
        abstio::write_json("data/save_tracker.json".to_string(), &ss);
    }
}

pub type Transition = widgetry::Transition<App>;

impl App {
    pub fn new(ctx: &mut EventCtx, model: Model) -> Self {
        reset_camera(ctx, &model.bounds);

        Self {
            model,
            source: None,

            selected: None,
            window: model::default_window(),
            poll_every: Duration::seconds(10.0),

            mapbox_bounds: Bounds::new(),
        }
    }

    /// Swaps in a new vehicle list. The selection survives if that vehicle is still around.
    pub fn set_model(&mut self, ctx: &mut EventCtx, model: Model) {
        // Only reset the camera when the area changes, so polling doesn't fight the user
        if self.model.bounds != model.bounds {
            reset_camera(ctx, &model.bounds);
        }
        self.model = model;

        if let Some(ref name) = self.selected {
            if self.model.lookup(name).is_none() {
                info!("{:?} is gone from the feed, deselecting", name);
                self.selected = None;
            }
        }
    }

    /// Called whenever a vehicle is activated, either on the map or from the list.
    pub fn select(&mut self, name: Option<VehicleName>) {
        debug!("Selected {:?}", name);
        self.selected = name;
    }

    /// Re-reads the feed if it changed. Returns true if the model was replaced.
    pub fn poll_source(&mut self, ctx: &mut EventCtx, force: bool) -> Result<bool> {
        let model = match self.source {
            Some(ref mut source) => {
                if !force && !source.has_changed()? {
                    return Ok(false);
                }
                info!("Reloading {}", source.describe());
                source.load()?
            }
            None => {
                return Ok(false);
            }
        };
        self.set_model(ctx, model);
        Ok(true)
    }

    // This only makes sense on native, with the same feed used across different runs.
    // before_quit is never called on web, and web starts with an empty model.
    fn restore_savestate(&mut self, ctx: &mut EventCtx) {
        if let Ok(savestate) = abstio::maybe_read_json::<Savestate>(
            "data/save_tracker.json".to_string(),
            &mut abstutil::Timer::throwaway(),
        ) {
            ctx.canvas.cam_x = savestate.cam_x;
            ctx.canvas.cam_y = savestate.cam_y;
            ctx.canvas.cam_zoom = savestate.cam_zoom;
            if let Some(name) = savestate.selected {
                if self.model.lookup(&name).is_some() {
                    self.selected = Some(name);
                }
            }
        }
    }

    pub fn sync_mapbox(&mut self, ctx: &mut EventCtx) {
        #[cfg(not(target_arch = "wasm32"))]
        let _ = ctx;
        #[cfg(target_arch = "wasm32")]
        {
            // This method is usually called for every single event, but the camera hasn't always
            // moved
            let bounds = ctx.canvas.get_screen_bounds();
            if self.mapbox_bounds == bounds {
                return;
            }
            self.mapbox_bounds = bounds;

            let pt1 = geom::Pt2D::new(bounds.min_x, bounds.min_y).to_gps(&self.model.gps_bounds);
            let pt2 = geom::Pt2D::new(bounds.max_x, bounds.max_y).to_gps(&self.model.gps_bounds);
            sync_mapbox_canvas(pt1.x(), pt1.y(), pt2.x(), pt2.y());
        }
    }
}

fn reset_camera(ctx: &mut EventCtx, bounds: &Bounds) {
    ctx.canvas.map_dims = (bounds.max_x, bounds.max_y);
    ctx.canvas.center_on_map_pt(bounds.center());
}

#[derive(Serialize, Deserialize)]
pub struct Savestate {
    cam_x: f64,
    cam_y: f64,
    cam_zoom: f64,
    selected: Option<VehicleName>,
}
