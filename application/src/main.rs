use std::{io, rc::Rc, sync::OnceLock};

use application::{
    args::Command, config, render, Args, Config, Console, Service, Session,
};
use service::{
    domain::{parcel, Filter, LatLng, Viewport},
    infra::Http,
    query, Query as _,
};
use tokio::{io::BufReader, task::LocalSet};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config, command } = Args::parse().map_err(|e| {
        // Help and version requests end up here too.
        _ = e.print();
    })?;

    let Config {
        api,
        map,
        layers,
        search,
        parcels,
        service,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let http = Http::new(&api.into()).map_err(|e| {
        log::error!("failed to initialize `Http` client: {e}");
    })?;
    let service = Service::new(service.into(), http);

    match command {
        Command::Sales { bbox, zoom, filter } => {
            let groups = service
                .execute(query::Sales {
                    viewport: Viewport { bbox, zoom },
                    filter: Filter::from(filter),
                })
                .await
                .map_err(|e| log::error!("failed to fetch sales: {e}"))?;
            print!("{}", render::groups(&groups));
        }
        Command::Detail { lat, lon } => {
            let position = LatLng::new(lat, lon)
                .ok_or_else(|| log::error!("invalid position: [{lat}, {lon}]"))?;
            let view = service
                .execute(query::Detail { position })
                .await
                .map_err(|e| log::error!("failed to fetch sales: {e}"))?;
            match view {
                Some(view) => print!("{}", render::detail(&view)),
                None => log::warn!("no sales found at {position}"),
            }
        }
        Command::Search { text, limit } => {
            let found = service
                .execute(query::SearchAddress {
                    text: text.join(" "),
                    limit: limit.unwrap_or(search.limit),
                })
                .await
                .map_err(|e| log::error!("failed to search addresses: {e}"))?;
            print!("{}", render::suggestions(&found));
        }
        Command::Parcels { insee, lat, lon } => {
            let query = match (insee, Command::point(lat, lon)) {
                (_, Some(point)) => parcel::Query::Point(point),
                (Some(insee), None) => config::Parcels { insee, ..parcels }
                    .query()
                    .ok_or_else(|| log::error!("invalid INSEE code"))?,
                (None, None) if lat.is_some() => {
                    log::error!("invalid position: [{lat:?}, {lon:?}]");
                    return Err(());
                }
                (None, None) => parcels
                    .query()
                    .ok_or_else(|| log::error!("invalid INSEE code"))?,
            };
            let found = service
                .execute(query::Parcels::by(query))
                .await
                .map_err(|e| log::error!("failed to fetch parcels: {e}"))?;
            print!("{}", render::parcels(&found));
        }
        Command::Session => {
            let viewport = map.viewport().map_err(|e| {
                eprintln!("{}", render::banner(&e));
                log::error!("failed to initialize base map: {e}");
            })?;
            let parcels = parcels
                .query()
                .ok_or_else(|| log::error!("invalid INSEE code"))?;
            let console = Rc::new(Console::new(
                io::stdout(),
                viewport,
                map.min_zoom.into()..=map.max_zoom.into(),
            ));
            let session = Session::new(
                Rc::new(service),
                console,
                layers.risk.into(),
                layers.cadastre.into(),
                parcels,
            );

            let local = LocalSet::new();
            local
                .run_until(session.run(BufReader::new(tokio::io::stdin())))
                .await
                .map_err(|e| log::error!("failed to read commands: {e}"))?;
            // Lets the requests still in flight complete.
            local.await;
        }
    }

    Ok(())
}
