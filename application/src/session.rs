//! Interactive map [`Session`].

use std::{cell::RefCell, fmt, io, rc::Rc};

use clap::{Parser, Subcommand, ValueEnum};
use service::{
    domain::{parcel, AddressGroup, Bbox, Filter, LatLng, Viewport, Zoom},
    infra::wms,
    layer::{self, Kind},
    query, view, Query,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};
use tracing as log;

use crate::Console;

/// Single line of a [`Session`] input.
#[derive(Debug, Parser)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Line {
    /// Command of this line.
    #[command(subcommand)]
    command: Command,
}

/// Command of a [`Session`].
#[derive(Debug, PartialEq, Subcommand)]
pub enum Command {
    /// Shows or hides a layer.
    Toggle {
        /// Layer to toggle.
        kind: Kind,

        /// Whether to show or hide the layer.
        state: Switch,
    },

    /// Moves the map.
    Move {
        /// Visible area as `swLng,swLat,neLng,neLat`.
        #[arg(allow_hyphen_values = true)]
        bbox: Bbox,

        /// Zoom level.
        zoom: Zoom,
    },

    /// Edits the sales filter form with `key=value` pairs, or clears it if
    /// none are given.
    Filter {
        /// Bounds to set (an empty value clears a bound).
        #[arg(value_parser = parse_bound)]
        bounds: Vec<(String, String)>,
    },

    /// Applies the sales filter form.
    Apply,

    /// Clicks the map.
    #[command(allow_negative_numbers = true)]
    Click {
        /// Latitude of the click.
        lat: f64,

        /// Longitude of the click.
        lon: f64,
    },

    /// Closes the detail panel.
    Close,

    /// Ends the session.
    Quit,
}

/// State of a toggled layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Switch {
    /// Layer is shown.
    On,

    /// Layer is hidden.
    Off,
}

/// Parses a `key=value` filter bound.
fn parse_bound(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .ok_or_else(|| format!("expected `key=value`, got `{s}`"))
}

/// Interactive map session driving the layers over a [`Console`].
///
/// Layers work in the background: the [`Session`] must run inside a
/// [`tokio::task::LocalSet`].
#[derive(Debug)]
pub struct Session<Svc, W> {
    /// Map the layers are drawn on.
    console: Rc<Console<W>>,

    /// Sales layer.
    sales: Rc<layer::Sales<Rc<Svc>, Rc<Console<W>>>>,

    /// Flood risk layer.
    risk: layer::Tiles<Rc<Console<W>>>,

    /// Cadastral map layer.
    cadastre: layer::Tiles<Rc<Console<W>>>,

    /// Cadastral parcels layer.
    parcels: Rc<layer::Parcels<Rc<Svc>, Rc<Console<W>>>>,

    /// Sales filter form, not applied yet.
    form: RefCell<Filter>,
}

impl<Svc, W> Session<Svc, W>
where
    Svc: Query<query::Sales, Ok = Vec<AddressGroup>, Err: fmt::Display>
        + Query<query::Detail, Ok = Option<view::View>, Err: fmt::Display>
        + Query<query::Parcels, Ok = parcel::Collection, Err: fmt::Display>
        + 'static,
    W: io::Write + 'static,
{
    /// Creates a new [`Session`] with all the layers disabled.
    #[must_use]
    pub fn new(
        service: Rc<Svc>,
        console: Rc<Console<W>>,
        risk: wms::Source,
        cadastre: wms::Source,
        parcels: parcel::Query,
    ) -> Self {
        Self {
            sales: layer::Sales::new(Rc::clone(&service), Rc::clone(&console)),
            risk: layer::Tiles::risk(risk, Rc::clone(&console)),
            cadastre: layer::Tiles::cadastre(cadastre, Rc::clone(&console)),
            parcels: layer::Parcels::new(service, Rc::clone(&console), parcels),
            form: RefCell::new(Filter::default()),
            console,
        }
    }

    /// Runs this [`Session`] until the `quit` command or the end of the
    /// provided `input`.
    ///
    /// Invalid lines are reported and skipped.
    ///
    /// # Errors
    ///
    /// If failed to read the `input`.
    pub async fn run(&self, input: impl AsyncBufRead + Unpin) -> io::Result<()> {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let words = line.split_whitespace().collect::<Vec<_>>();
            if words.is_empty() {
                continue;
            }

            match Line::try_parse_from(words) {
                Ok(Line {
                    command: Command::Quit,
                }) => break,
                Ok(Line { command }) => self.handle(command),
                Err(e) => self.console.print(e.render()),
            }
            // Lets the layers start the work spawned by the command.
            tokio::task::yield_now().await;
        }
        log::info!("session ended");
        Ok(())
    }

    /// Handles the provided [`Command`].
    fn handle(&self, command: Command) {
        match command {
            Command::Toggle { kind, state } => self.toggle(kind, state),
            Command::Move { bbox, zoom } => {
                self.console.move_to(Viewport { bbox, zoom });
            }
            Command::Filter { bounds } => self.edit_form(bounds),
            Command::Apply => {
                let filter = self.form.borrow().clone();
                _ = tokio::task::spawn_local(self.sales.apply(filter));
            }
            Command::Click { lat, lon } => match LatLng::new(lat, lon) {
                Some(position) => {
                    _ = self.console.click(position);
                }
                None => self.console.print(format_args!(
                    "invalid position: [{lat}, {lon}]",
                )),
            },
            Command::Close => self.sales.close_detail(),
            Command::Quit => {}
        }
    }

    /// Shows or hides the layer of the provided [`Kind`].
    fn toggle(&self, kind: Kind, state: Switch) {
        match (kind, state) {
            (Kind::Dvf, Switch::On) => {
                _ = tokio::task::spawn_local(self.sales.enable());
            }
            (Kind::Dvf, Switch::Off) => self.sales.disable(),
            (Kind::Risk, Switch::On) => self.risk.enable(),
            (Kind::Risk, Switch::Off) => self.risk.disable(),
            (Kind::Cadastre, Switch::On) => self.cadastre.enable(),
            (Kind::Cadastre, Switch::Off) => self.cadastre.disable(),
            (Kind::Parcels, Switch::On) => {
                _ = tokio::task::spawn_local(self.parcels.enable());
            }
            (Kind::Parcels, Switch::Off) => self.parcels.disable(),
        }
    }

    /// Sets the provided `bounds` in the sales filter form.
    fn edit_form(&self, bounds: Vec<(String, String)>) {
        let mut form = self.form.borrow_mut();
        if bounds.is_empty() {
            *form = Filter::default();
        }
        for (key, value) in bounds {
            if let Err(e) = form.set(&key, &value) {
                self.console.print(e);
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{cell::RefCell, convert::Infallible, rc::Rc};

    use clap::Parser as _;
    use common::{Date, Money};
    use service::{
        domain::{
            parcel::{self, Collection, Feature, InseeCode},
            sale::{Address, AddressKey},
            AddressGroup, Bbox, Filter, LatLng, Mutation, Viewport, Zoom,
        },
        infra::wms,
        layer::Kind,
        query, view, Query,
    };
    use tokio::task::LocalSet;

    use crate::Console;

    use super::{Command, Line, Session, Switch};

    /// Service answering every query at once.
    #[derive(Debug, Default)]
    struct Stub {
        filters: RefCell<Vec<Filter>>,
    }

    impl Query<query::Sales> for Stub {
        type Ok = Vec<AddressGroup>;
        type Err = Infallible;

        async fn execute(
            &self,
            query: query::Sales,
        ) -> Result<Self::Ok, Self::Err> {
            self.filters.borrow_mut().push(query.filter);
            Ok(vec![AddressGroup {
                key: AddressKey::Address(Address::new("1 Rue Haute").unwrap()),
                position: LatLng::new(48.86, 2.31).unwrap(),
                mutations: vec![Mutation {
                    id: None,
                    date: Date::from_ymd(2022, 5, 4),
                    price: Some(Money::new(420_000.into())),
                    lots: vec![],
                }],
            }])
        }
    }

    impl Query<query::Detail> for Stub {
        type Ok = Option<view::View>;
        type Err = Infallible;

        async fn execute(
            &self,
            _: query::Detail,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(Some(view::View {
                address: "1 Rue Haute".into(),
                mutations: vec![],
            }))
        }
    }

    impl Query<query::Parcels> for Stub {
        type Ok = Collection;
        type Err = Infallible;

        async fn execute(
            &self,
            _: query::Parcels,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(Collection {
                features: vec![Feature {
                    section: Some("AB".into()),
                    number: Some("0042".into()),
                    ..Feature::default()
                }],
            })
        }
    }

    fn session() -> (Rc<Stub>, Rc<Console<Vec<u8>>>, Session<Stub, Vec<u8>>) {
        let stub = Rc::new(Stub::default());
        let console = Rc::new(Console::new(
            vec![],
            Viewport {
                bbox: "2.30,48.85,2.35,48.90".parse::<Bbox>().unwrap(),
                zoom: Zoom::from(12),
            },
            Zoom::from(5)..=Zoom::from(18),
        ));
        let session = Session::new(
            Rc::clone(&stub),
            Rc::clone(&console),
            wms::Source::default(),
            wms::Source::default(),
            parcel::Query::Commune {
                insee: InseeCode::new("75056").unwrap(),
                limit: 10,
            },
        );
        (stub, console, session)
    }

    async fn run(session: &Session<Stub, Vec<u8>>, input: &str) {
        let local = LocalSet::new();
        local.run_until(session.run(input.as_bytes())).await.unwrap();
        local.await;
    }

    fn parse(line: &str) -> Result<Command, clap::Error> {
        Line::try_parse_from(line.split_whitespace()).map(|l| l.command)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse("toggle DVF on").unwrap(),
            Command::Toggle {
                kind: Kind::Dvf,
                state: Switch::On,
            },
        );
        assert_eq!(
            parse("click 43.3 -1.5").unwrap(),
            Command::Click {
                lat: 43.3,
                lon: -1.5,
            },
        );
        assert_eq!(
            parse("filter year_min=2020 price_max=").unwrap(),
            Command::Filter {
                bounds: vec![
                    ("year_min".into(), "2020".into()),
                    ("price_max".into(), String::new()),
                ],
            },
        );
        assert!(matches!(
            parse("move -1.6,47.2,-1.5,47.3 13").unwrap(),
            Command::Move { .. },
        ));

        assert!(parse("toggle roads on").is_err());
        assert!(parse("toggle dvf maybe").is_err());
        assert!(parse("filter year_min").is_err());
        assert!(parse("fly").is_err());
    }

    #[tokio::test]
    async fn drives_sales_layer() {
        let (_, console, session) = session();

        run(
            &session,
            "toggle dvf on\n\
             move 2.30,48.85,2.32,48.87 14\n\
             click 48.8601 2.3101\n\
             close\n\
             quit\n\
             toggle risk on\n",
        )
        .await;

        let out = console.take_output();
        assert!(out.contains("+ panel: sales filters"), "{out}");
        assert!(out.contains("+ overlay #1: 1 markers"), "{out}");
        assert!(out.contains("~ moved to `2.30000,48.85000,2.32000,48.87000`"));
        assert!(out.contains("- overlay #1\n+ overlay #2: 1 markers"), "{out}");
        assert!(out.contains("== 1 Rue Haute ==\n- detail"), "{out}");
        assert!(!out.contains("risk legend"), "{out}");
    }

    #[tokio::test]
    async fn applies_filter_form() {
        let (stub, console, session) = session();

        run(
            &session,
            "toggle dvf on\n\
             filter year_min=2020 surface=10\n\
             apply\n\
             filter\n\
             apply\n",
        )
        .await;

        let filters = stub.filters.borrow();
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0], Filter::default());
        assert_eq!(filters[1].year_min, Some(2020));
        assert_eq!(filters[2], Filter::default());
        assert!(console.take_output().contains("unknown filter key `surface`"));
    }

    #[tokio::test]
    async fn toggles_tiles_and_parcels() {
        let (_, console, session) = session();

        run(
            &session,
            "toggle risk on\n\
             toggle parcels on\n\
             toggle risk off\n\
             toggle parcels off\n\
             click 95 0\n",
        )
        .await;

        let out = console.take_output();
        assert!(out.contains("+ panel: risk legend"), "{out}");
        assert!(out.contains("+ panel: risk info"), "{out}");
        assert!(out.contains("+ overlay #2: 1 parcels\n  Parcelle: AB-0042"));
        assert!(out.contains("- overlay #1"), "{out}");
        assert!(out.contains("- overlay #2"), "{out}");
        assert!(out.contains("invalid position: [95, 0]"), "{out}");
    }
}
