use std::collections::BTreeMap;

use anyhow::Result;
use geom::{Distance, Duration};
use widgetry::mapspace::{ObjectID, World, WorldOutcome};
use widgetry::tools::PopupMsg;
use widgetry::{
    Choice, Color, Drawable, EventCtx, GeomBatch, GfxCtx, HorizontalAlignment, Key, Line, Outcome,
    Panel, State, TextExt, UpdateType, VerticalAlignment, Widget,
};

use model::{Focus, Marker, Model, VehicleID, VehicleName};

use crate::components::{describe, icons, FileLoader, PickedFile};
use crate::{App, Transition};

// Pixels per meter. About a web map's zoom level 15: the streets around the vehicle.
const FOCUS_ZOOM: f64 = 0.25;

/// Plots every vehicle at its latest position. Selecting one draws its recent journey and opens
/// its callout.
pub struct MapView {
    panel: Panel,
    // Only open while a vehicle is selected
    callout: Option<Panel>,
    world: World<Obj>,
    // Filled by the rendering pass; recentering reads it to find the callout
    markers: BTreeMap<VehicleID, Marker>,
    journey: Drawable,
    since_poll: Duration,
    // Errors found while building the state, shown on the first event
    error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Obj {
    Vehicle(VehicleID),
    JourneyStart,
}
impl ObjectID for Obj {}

impl MapView {
    pub fn new_state(ctx: &mut EventCtx, app: &App) -> Box<dyn State<App>> {
        let mut state = Self {
            panel: Panel::new_builder(Widget::col(vec![
                Line("Vehicle Tracker").small_heading().into_widget(ctx),
                Widget::row(vec![
                    ctx.style().btn_outline.text("Load feed").build_def(ctx),
                    ctx.style()
                        .btn_outline
                        .text("Reload")
                        .hotkey(Key::R)
                        .disabled(app.source.is_none())
                        .build_def(ctx),
                ]),
                Widget::placeholder(ctx, "vehicles"),
            ]))
            .aligned(HorizontalAlignment::Left, VerticalAlignment::Top)
            .build(ctx),
            callout: None,
            world: World::unbounded(),
            markers: BTreeMap::new(),
            journey: Drawable::empty(ctx),
            since_poll: Duration::ZERO,
            error: None,
        };
        if let Err(err) = state.on_vehicles_change(ctx, app) {
            state.error = Some(err.to_string());
        }
        Box::new(state)
    }

    /// The rendering pass: rebuild every marker, then redo the selection on top of them.
    fn on_vehicles_change(&mut self, ctx: &mut EventCtx, app: &App) -> Result<()> {
        self.panel
            .replace(ctx, "vehicles", vehicle_list(ctx, &app.model, &app.selected));

        // Clear everything first, so a malformed feed doesn't leave stale state around
        self.markers.clear();
        self.world = World::unbounded();
        self.callout = None;
        self.journey = Drawable::empty(ctx);
        self.markers = app.model.markers(app.window)?;
        self.on_selection_change(ctx, app)
    }

    fn on_selection_change(&mut self, ctx: &mut EventCtx, app: &App) -> Result<()> {
        self.callout = None;
        self.journey = Drawable::empty(ctx);

        let focus = match app.selected {
            Some(ref name) => app.model.focus(name, app.window),
            None => Ok(None),
        };
        // Still draw the markers if the selected vehicle is broken
        self.world = make_world(
            ctx,
            app,
            &self.markers,
            focus.as_ref().ok().and_then(|f| f.as_ref()),
        );
        let focus = match focus? {
            Some(focus) => focus,
            None => {
                return Ok(());
            }
        };

        if let Some(pl) = focus.journey.to_polyline(&app.model.gps_bounds) {
            let mut batch = GeomBatch::new();
            batch.push(
                Color::BLUE.alpha(0.7),
                pl.make_polygons(Distance::meters(4.0)),
            );
            self.journey = ctx.upload(batch);
        }
        if let Some(pt) = focus.journey.start_pt(&app.model.gps_bounds) {
            ctx.canvas.cam_zoom = FOCUS_ZOOM;
            ctx.canvas.center_on_map_pt(pt);
        }
        if let Some(marker) = self.markers.get(&focus.vehicle) {
            self.callout = Some(make_callout(ctx, marker));
        }
        Ok(())
    }

    fn select(
        &mut self,
        ctx: &mut EventCtx,
        app: &mut App,
        name: Option<VehicleName>,
    ) -> Transition {
        app.select(name);
        self.panel
            .replace(ctx, "vehicles", vehicle_list(ctx, &app.model, &app.selected));
        let result = self.on_selection_change(ctx, app);
        on_result(ctx, result)
    }

    fn reload(&mut self, ctx: &mut EventCtx, app: &mut App, force: bool) -> Transition {
        match app.poll_source(ctx, force) {
            Ok(true) => {
                let result = self.on_vehicles_change(ctx, app);
                on_result(ctx, result)
            }
            Ok(false) => Transition::Keep,
            Err(err) => {
                warn!("Couldn't reload vehicles: {err}");
                // Polling shouldn't nag every few seconds, but an explicit reload should say why
                // it failed
                if force {
                    error_popup(ctx, err.to_string())
                } else {
                    Transition::Keep
                }
            }
        }
    }
}

impl State<App> for MapView {
    fn event(&mut self, ctx: &mut EventCtx, app: &mut App) -> Transition {
        if let Some(err) = self.error.take() {
            return error_popup(ctx, err);
        }

        app.sync_mapbox(ctx);

        if let WorldOutcome::ClickedObject(Obj::Vehicle(id)) = self.world.event(ctx) {
            self.world.hack_unset_hovering();
            let name = app.model.vehicles[id.0].name.clone();
            return self.select(ctx, app, Some(name));
        }

        if let Some(ref mut callout) = self.callout {
            if let Outcome::Clicked(x) = callout.event(ctx) {
                match x.as_ref() {
                    // Just hides the callout; the vehicle stays selected
                    "close" => {
                        self.callout = None;
                    }
                    _ => unreachable!(),
                }
            }
        }

        match self.panel.event(ctx) {
            Outcome::Clicked(x) => match x.as_ref() {
                "Load feed" => {
                    return load_feed(ctx);
                }
                "Reload" => {
                    return self.reload(ctx, app, true);
                }
                _ => unreachable!(),
            },
            Outcome::Changed(x) => match x.as_ref() {
                "vehicle" => {
                    let name = self.panel.dropdown_value("vehicle");
                    return self.select(ctx, app, name);
                }
                _ => unreachable!(),
            },
            _ => {}
        }

        if app.source.is_some() {
            if let Some(dt) = ctx.input.nonblocking_is_update_event() {
                ctx.input.use_update_event();
                self.since_poll += dt;
                if self.since_poll >= app.poll_every {
                    self.since_poll = Duration::ZERO;
                    let transition = self.reload(ctx, app, false);
                    if !matches!(transition, Transition::Keep) {
                        return transition;
                    }
                }
            }
            ctx.request_update(UpdateType::Game);
        }

        Transition::Keep
    }

    fn draw(&self, g: &mut GfxCtx, _: &App) {
        self.world.draw(g);
        g.redraw(&self.journey);
        self.panel.draw(g);
        if let Some(ref callout) = self.callout {
            callout.draw(g);
        }
    }

    fn recreate(&mut self, ctx: &mut EventCtx, app: &mut App) -> Box<dyn State<App>> {
        Self::new_state(ctx, app)
    }
}

fn make_world(
    ctx: &mut EventCtx,
    app: &App,
    markers: &BTreeMap<VehicleID, Marker>,
    focus: Option<&Focus>,
) -> World<Obj> {
    let mut world = World::bounded(&app.model.bounds);
    if cfg!(not(target_arch = "wasm32")) {
        // Without a basemap, at least show where the data is
        world.draw_master_batch(
            ctx,
            GeomBatch::from(vec![(Color::grey(0.1), app.model.bounds.get_rectangle())]),
        );
    }

    for marker in markers.values() {
        let (batch, hitbox) = icons::vehicle(ctx, marker.pos(&app.model.gps_bounds));
        world
            .add(Obj::Vehicle(marker.vehicle))
            .hitbox(hitbox)
            .draw(batch)
            .hover_alpha(0.5)
            .tooltip(describe::marker(marker))
            .clickable()
            .build(ctx);
    }

    if let Some(pt) = focus.and_then(|f| f.journey.start_pt(&app.model.gps_bounds)) {
        let (batch, hitbox) = icons::journey_start(ctx, pt);
        world
            .add(Obj::JourneyStart)
            .hitbox(hitbox)
            .draw(batch)
            .hover_alpha(0.5)
            .tooltip(describe::journey_start())
            .build(ctx);
    }

    world.initialize_hover(ctx);
    world
}

fn vehicle_list(ctx: &mut EventCtx, model: &Model, selected: &Option<VehicleName>) -> Widget {
    let mut choices = vec![Choice::new("none", None)];
    for vehicle in &model.vehicles {
        choices.push(Choice::new(
            format!("{} ({} updates)", vehicle.name.0, vehicle.updates.len()),
            Some(vehicle.name.clone()),
        ));
    }
    Widget::col(vec![
        format!("{} vehicles", model.vehicles.len()).text_widget(ctx),
        Widget::dropdown(ctx, "vehicle", selected.clone(), choices),
    ])
}

fn make_callout(ctx: &mut EventCtx, marker: &Marker) -> Panel {
    Panel::new_builder(Widget::col(vec![
        Widget::row(vec![
            Line(&marker.name.0).small_heading().into_widget(ctx),
            ctx.style().btn_close_widget(ctx),
        ]),
        describe::marker(marker).into_widget(ctx),
    ]))
    .aligned(HorizontalAlignment::Right, VerticalAlignment::Top)
    .build(ctx)
}

fn on_result(ctx: &mut EventCtx, result: Result<()>) -> Transition {
    match result {
        Ok(()) => Transition::Keep,
        Err(err) => error_popup(ctx, err.to_string()),
    }
}

fn error_popup(ctx: &mut EventCtx, err: String) -> Transition {
    error!("{err}");
    Transition::Push(PopupMsg::new_state(ctx, "Error", vec![err]))
}

fn load_feed(ctx: &mut EventCtx) -> Transition {
    Transition::Push(FileLoader::new_state(ctx, Box::new(on_feed_picked)))
}

fn on_feed_picked(
    ctx: &mut EventCtx,
    app: &mut App,
    maybe_file: Result<Option<PickedFile>>,
) -> Transition {
    match maybe_file {
        Ok(Some((filename, bytes))) => match Model::load_bytes(&filename, &bytes) {
            Ok(model) => {
                info!("Loaded vehicles from {filename}");
                // A picked file can't be re-read later
                app.source = None;
                app.set_model(ctx, model);
                Transition::Multi(vec![Transition::Pop, Transition::Recreate])
            }
            Err(err) => {
                Transition::Replace(PopupMsg::new_state(ctx, "Error", vec![err.to_string()]))
            }
        },
        // User didn't pick a file
        Ok(None) => Transition::Pop,
        Err(err) => Transition::Replace(PopupMsg::new_state(ctx, "Error", vec![err.to_string()])),
    }
}
