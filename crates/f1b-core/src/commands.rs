//! Bot commands: fetch from the data provider, build a `Report`.
//!
//! Handlers here know nothing about Telegram. The transport parses the text,
//! calls `dispatch`, and delivers the report with `send_report`.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    command::Command,
    domain::{ChatId, Race},
    errors::Error,
    formatting::render_html_pages,
    ports::{DataProvider, MessagingPort},
    report::Report,
    resolve::{resolve, Resolution},
    timing::{
        combine, compact_duration, countdown, race_hour_comment, DisplayZone, LONG_FORMAT,
        SHORT_FORMAT,
    },
    Result,
};

/// Command names the dispatcher knows, in help order.
pub const COMMANDS: [&str; 5] = ["help", "next", "last", "current", "results"];

pub const DEFAULT_RESULTS_LIMIT: usize = 10;

/// Everything a command needs besides its arguments.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub provider: &'a dyn DataProvider,
    pub zone: DisplayZone,
    pub prefix: &'a str,
    pub now: DateTime<Utc>,
    pub results_limit: usize,
}

/// Route a parsed command to its handler.
pub async fn dispatch(ctx: &CommandContext<'_>, cmd: &Command) -> Result<Report> {
    match cmd.name.as_str() {
        "" | "help" => Ok(help(ctx.prefix)),
        "next" => next_race(ctx).await,
        "last" => last_race(ctx).await,
        "current" => current_season(ctx).await,
        "results" => results(ctx, &cmd.arguments).await,
        other => unknown_command(ctx.prefix, other),
    }
}

/// The message shown to the user when a command fails.
pub fn error_reply(err: &Error) -> String {
    format!("Ups, seems like there was a problem executing the command. The error reported is: {err}")
}

/// Render a report for the messenger and send it, split across messages if needed.
pub async fn send_report(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    report: &Report,
) -> Result<()> {
    for page in render_html_pages(report, messenger.safe_message_len()) {
        messenger.send_html(chat_id, &page).await?;
    }
    Ok(())
}

pub fn help(prefix: &str) -> Report {
    let mut r = Report::new("Help")
        .with_description(format!("usage: {prefix} [command] [command_args...]"));
    r.set_table_header(["Command", "Description"]);
    r.rows = [
        ("help", "shows this message"),
        ("next", "shows information about the next race"),
        ("last", "shows information about the last race"),
        ("current", "shows races for the current season"),
        (
            "results circuit <circuit>",
            "winners at a given circuit for the last years",
        ),
        ("results driver <driver>", "last results for a driver"),
    ]
    .into_iter()
    .map(|(c, d)| vec![c.to_string(), d.to_string()])
    .collect();
    r
}

fn unknown_command(prefix: &str, name: &str) -> Result<Report> {
    let mut desc = format!("Command '{name}' not recognized.");
    if let Resolution::Suggested { candidate, .. } = resolve(name, &COMMANDS)? {
        desc.push_str(&format!(" Maybe you meant '{prefix} {candidate}'?"));
    }
    desc.push_str(&format!(" Send '{prefix} help' for the list of commands."));
    Ok(Report::new("Unknown command").with_description(desc))
}

fn race_place(race: &Race) -> String {
    format!(
        "{} at {} ({}, {})",
        race.race_name,
        race.circuit.circuit_name,
        race.circuit.location.locality,
        race.circuit.location.country
    )
}

pub async fn next_race(ctx: &CommandContext<'_>) -> Result<Report> {
    let race = ctx.provider.next_race().await?;

    let start = ctx
        .zone
        .zoned(&race.date, race.time.as_deref().unwrap_or_default())?;
    let left = start.with_timezone(&Utc).signed_duration_since(ctx.now);

    let mut r = Report::new("Next race").with_description(format!(
        "The next race is the {}. The race will be on {} ({}). {}",
        race_place(&race),
        start.format(LONG_FORMAT),
        countdown(left),
        race_hour_comment(&start)
    ));

    r.set_table_header(["Session", "Time", "Starts in"]);
    for (name, session) in race.sessions() {
        let time = session.time.as_deref().unwrap_or_default();
        let row = match ctx.zone.zoned(&session.date, time) {
            Ok(at) => {
                let left = at.with_timezone(&Utc).signed_duration_since(ctx.now);
                let starts_in = if left < chrono::Duration::zero() {
                    countdown(left)
                } else {
                    compact_duration(left)
                };
                [
                    name.to_string(),
                    at.format(SHORT_FORMAT).to_string(),
                    starts_in,
                ]
            }
            Err(_) => [name.to_string(), session.date.clone(), "-".to_string()],
        };
        r.add_row(row)?;
    }

    Ok(r)
}

pub async fn last_race(ctx: &CommandContext<'_>) -> Result<Report> {
    let race = ctx.provider.last_race().await?;

    let start = ctx
        .zone
        .zoned(&race.date, race.time.as_deref().unwrap_or_default())?;

    let mut r = Report::new("Last race results").with_description(format!(
        "The last race was the {}. The race was on {}. The results are as follow:",
        race_place(&race),
        start.format(LONG_FORMAT)
    ));

    r.set_table_header(["Pos.", "Driver", "Constructor", "Time", "Fastest Lap", "Started"]);
    for res in &race.results {
        r.add_row([
            res.position_text.clone(),
            res.driver.full_name(),
            res.constructor.name.clone(),
            res.time_or_status().to_string(),
            res.fastest_lap_time().to_string(),
            res.grid.clone(),
        ])?;
    }

    Ok(r)
}

pub async fn current_season(ctx: &CommandContext<'_>) -> Result<Report> {
    let races = ctx.provider.current_season().await?;
    if races.is_empty() {
        return Err(Error::NotFound("no races in the current season".to_string()));
    }

    let mut r = Report::new("Races for the current season");
    r.set_table_header(["Round", "Circuit", "Location", "Country", "Time"]);
    for race in &races {
        let time = race.time.as_deref().unwrap_or_default();
        let when = match ctx.zone.zoned(&race.date, time) {
            Ok(t) => t.format(SHORT_FORMAT).to_string(),
            Err(_) => combine(&race.date, time),
        };
        r.add_row([
            race.round.clone(),
            race.circuit.circuit_name.clone(),
            race.circuit.location.locality.clone(),
            race.circuit.location.country.clone(),
            when,
        ])?;
    }

    Ok(r)
}

pub async fn results(ctx: &CommandContext<'_>, args: &[String]) -> Result<Report> {
    let Some(sub) = args.first() else {
        return Err(Error::InvalidCommand(
            "command 'results' needs more arguments: 'circuit <circuit>' or 'driver <driver>'"
                .to_string(),
        ));
    };

    match sub.as_str() {
        "circuit" => {
            let id = args.get(1).ok_or_else(|| {
                Error::InvalidCommand(
                    "command 'results circuit' needs a circuit id as an argument".to_string(),
                )
            })?;
            circuit_results(ctx, id).await
        }
        "driver" => {
            let id = args.get(1).ok_or_else(|| {
                Error::InvalidCommand(
                    "command 'results driver' needs a driver id as an argument".to_string(),
                )
            })?;
            driver_results(ctx, id).await
        }
        other => Err(Error::InvalidCommand(format!(
            "subcommand '{other}' of 'results' not recognized"
        ))),
    }
}

/// Keep the newest `n` races (input is oldest first), newest first.
fn newest(races: &[Race], n: usize) -> impl Iterator<Item = &Race> {
    let skip = races.len().saturating_sub(n);
    races[skip..].iter().rev()
}

pub async fn circuit_results(ctx: &CommandContext<'_>, circuit_id: &str) -> Result<Report> {
    let circuits = ctx.provider.circuits().await?;
    let ids: Vec<&str> = circuits.iter().map(|c| c.circuit_id.as_str()).collect();

    let resolution = resolve(circuit_id, &ids)?;
    if let Some(msg) = resolution.did_you_mean("circuit", circuit_id) {
        debug!(circuit_id, ?resolution, "unknown circuit");
        return Ok(Report::new("Circuit not found").with_description(msg));
    }

    let races = ctx.provider.circuit_winners(circuit_id).await?;
    if races.is_empty() {
        return Err(Error::NotFound(format!("no races held at '{circuit_id}'")));
    }

    let n = ctx.results_limit.min(races.len());
    let name = circuits
        .iter()
        .find(|c| c.circuit_id == circuit_id)
        .map(|c| c.circuit_name.as_str())
        .unwrap_or(circuit_id);

    let mut r = Report::new(format!("Winners in the last {n} races at {name}"));
    r.set_table_header(["Year", "Driver", "Constructor", "Time", "Laps"]);
    for race in newest(&races, n) {
        let row = match race.winner() {
            Some(w) => [
                race.season.clone(),
                w.driver.full_name(),
                w.constructor.name.clone(),
                w.time_or_status().to_string(),
                w.laps.clone(),
            ],
            None => [
                race.season.clone(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ],
        };
        r.add_row(row)?;
    }

    Ok(r)
}

pub async fn driver_results(ctx: &CommandContext<'_>, driver_id: &str) -> Result<Report> {
    let drivers = ctx.provider.drivers().await?;
    let ids: Vec<&str> = drivers.iter().map(|d| d.driver_id.as_str()).collect();

    let resolution = resolve(driver_id, &ids)?;
    if let Some(msg) = resolution.did_you_mean("driver", driver_id) {
        debug!(driver_id, ?resolution, "unknown driver");
        return Ok(Report::new("Driver not found").with_description(msg));
    }

    let races = ctx.provider.driver_results(driver_id).await?;
    if races.is_empty() {
        return Err(Error::NotFound(format!("no results for '{driver_id}'")));
    }

    let n = ctx.results_limit.min(races.len());
    let name = drivers
        .iter()
        .find(|d| d.driver_id == driver_id)
        .map(|d| d.full_name())
        .unwrap_or_else(|| driver_id.to_string());

    let mut r = Report::new(format!("Last {n} results for {name}"));
    r.set_table_header(["Year", "Race", "Constructor", "Started", "Pos.", "Points"]);
    for race in newest(&races, n) {
        let row = match race.results.first() {
            Some(res) => [
                race.season.clone(),
                race.race_name.clone(),
                res.constructor.name.clone(),
                res.grid.clone(),
                res.position_text.clone(),
                res.points.clone(),
            ],
            None => [
                race.season.clone(),
                race.race_name.clone(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ],
        };
        r.add_row(row)?;
    }

    Ok(r)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::{
        command::parse,
        domain::{Circuit, Constructor, Driver, LapTime, Location, RaceResult, Schedule},
        report::render,
    };

    fn circuit(id: &str, name: &str, locality: &str, country: &str) -> Circuit {
        Circuit {
            circuit_id: id.to_string(),
            circuit_name: name.to_string(),
            location: Location {
                locality: locality.to_string(),
                country: country.to_string(),
                ..Location::default()
            },
            ..Circuit::default()
        }
    }

    fn driver(id: &str, given: &str, family: &str) -> Driver {
        Driver {
            driver_id: id.to_string(),
            given_name: given.to_string(),
            family_name: family.to_string(),
            ..Driver::default()
        }
    }

    fn result(pos: &str, d: Driver, team: &str, time: Option<&str>) -> RaceResult {
        RaceResult {
            position: pos.to_string(),
            position_text: pos.to_string(),
            points: "25".to_string(),
            driver: d,
            constructor: Constructor {
                name: team.to_string(),
                ..Constructor::default()
            },
            grid: "1".to_string(),
            laps: "53".to_string(),
            status: "+1 Lap".to_string(),
            time: time.map(|t| LapTime {
                millis: None,
                time: t.to_string(),
            }),
            fastest_lap: None,
            ..RaceResult::default()
        }
    }

    fn monza_race(season: &str, winner: Option<RaceResult>) -> Race {
        Race {
            season: season.to_string(),
            round: "16".to_string(),
            race_name: "Italian Grand Prix".to_string(),
            circuit: circuit("monza", "Autodromo Nazionale di Monza", "Monza", "Italy"),
            date: format!("{season}-09-01"),
            time: Some("13:00:00Z".to_string()),
            results: winner.into_iter().collect(),
            ..Race::default()
        }
    }

    #[derive(Default)]
    struct FakeProvider {
        circuit_calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DataProvider for FakeProvider {
        async fn next_race(&self) -> Result<Race> {
            let mut race = monza_race("2024", None);
            race.first_practice = Some(Schedule {
                date: "2024-08-30".to_string(),
                time: Some("11:30:00Z".to_string()),
            });
            race.qualifying = Some(Schedule {
                date: "2024-08-31".to_string(),
                time: Some("14:00:00Z".to_string()),
            });
            Ok(race)
        }

        async fn last_race(&self) -> Result<Race> {
            let mut race = monza_race(
                "2024",
                Some(result(
                    "1",
                    driver("leclerc", "Charles", "Leclerc"),
                    "Ferrari",
                    Some("1:14:40.727"),
                )),
            );
            race.results.push(result(
                "2",
                driver("piastri", "Oscar", "Piastri"),
                "McLaren",
                Some("+2.664"),
            ));
            race.results.push(result(
                "20",
                driver("sargeant", "Logan", "Sargeant"),
                "Williams",
                None,
            ));
            Ok(race)
        }

        async fn current_season(&self) -> Result<Vec<Race>> {
            let mut no_time = monza_race("2024", None);
            no_time.round = "17".to_string();
            no_time.time = None;
            Ok(vec![monza_race("2024", None), no_time])
        }

        async fn circuits(&self) -> Result<Vec<Circuit>> {
            Ok(vec![
                circuit("silverstone", "Silverstone Circuit", "Silverstone", "UK"),
                circuit("monza", "Autodromo Nazionale di Monza", "Monza", "Italy"),
                circuit("spa", "Circuit de Spa-Francorchamps", "Spa", "Belgium"),
            ])
        }

        async fn drivers(&self) -> Result<Vec<Driver>> {
            Ok(vec![
                driver("leclerc", "Charles", "Leclerc"),
                driver("max_verstappen", "Max", "Verstappen"),
            ])
        }

        async fn circuit_winners(&self, circuit_id: &str) -> Result<Vec<Race>> {
            self.circuit_calls
                .lock()
                .unwrap()
                .push(circuit_id.to_string());
            Ok((2010..=2024)
                .map(|y| {
                    monza_race(
                        &y.to_string(),
                        Some(result(
                            "1",
                            driver("x", "Winner", &y.to_string()),
                            "Team",
                            Some("1:20:00"),
                        )),
                    )
                })
                .collect())
        }

        async fn driver_results(&self, _driver_id: &str) -> Result<Vec<Race>> {
            Ok(vec![
                monza_race(
                    "2019",
                    Some(result(
                        "1",
                        driver("leclerc", "Charles", "Leclerc"),
                        "Ferrari",
                        None,
                    )),
                ),
                monza_race("2021", None),
                monza_race(
                    "2024",
                    Some(result(
                        "1",
                        driver("leclerc", "Charles", "Leclerc"),
                        "Ferrari",
                        None,
                    )),
                ),
            ])
        }
    }

    #[derive(Default)]
    struct FakeMessenger {
        sent: Mutex<Vec<(ChatId, String)>>,
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        fn safe_message_len(&self) -> usize {
            200
        }

        async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
            self.sent.lock().unwrap().push((chat_id, html.to_string()));
            Ok(())
        }

        async fn send_typing(&self, _chat_id: ChatId) -> Result<()> {
            Ok(())
        }
    }

    fn ctx(provider: &FakeProvider) -> CommandContext<'_> {
        CommandContext {
            provider,
            zone: DisplayZone::default(),
            prefix: "!f1",
            // Friday 2024-08-30 10:00 UTC.
            now: Utc.with_ymd_and_hms(2024, 8, 30, 10, 0, 0).unwrap(),
            results_limit: DEFAULT_RESULTS_LIMIT,
        }
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let p = FakeProvider::default();
        let r = dispatch(&ctx(&p), &parse("help")).await.unwrap();
        assert_eq!(r.description.as_deref(), Some("usage: !f1 [command] [command_args...]"));
        for name in COMMANDS {
            assert!(r.rows.iter().any(|row| row[0].starts_with(name)), "{name}");
        }
        assert!(r.validate().is_ok());
        assert_eq!(dispatch(&ctx(&p), &parse("")).await.unwrap(), r);
    }

    #[tokio::test]
    async fn next_race_has_countdown_and_sessions() {
        let p = FakeProvider::default();
        let r = dispatch(&ctx(&p), &parse("next")).await.unwrap();
        let desc = r.description.clone().unwrap();
        assert!(desc.contains("Italian Grand Prix at Autodromo Nazionale di Monza (Monza, Italy)"));
        assert!(desc.contains("Sunday, 01 September 2024 14:00 WEST"));
        // 2 days 3 hours = 51h = 2.125 days.
        assert!(desc.contains("(2.1 days to go)"), "{desc}");
        assert!(desc.contains("decent hour"));

        assert_eq!(r.table_header, vec!["Session", "Time", "Starts in"]);
        assert_eq!(
            r.rows,
            vec![
                vec!["Practice 1", "30 Aug 12:30 WEST", "1h30m"],
                vec!["Qualifying", "31 Aug 15:00 WEST", "1d4h0m"],
                vec!["Race", "01 Sep 14:00 WEST", "2d3h0m"],
            ]
        );
    }

    #[tokio::test]
    async fn last_race_lists_results() {
        let p = FakeProvider::default();
        let r = dispatch(&ctx(&p), &parse("last")).await.unwrap();
        assert_eq!(r.rows.len(), 3);
        assert_eq!(r.rows[0][1], "Charles Leclerc");
        assert_eq!(r.rows[2][3], "+1 Lap");
        assert!(render(&r).starts_with("**LAST RACE RESULTS**\nThe last race was the Italian Grand Prix"));
    }

    #[tokio::test]
    async fn current_season_falls_back_to_raw_time() {
        let p = FakeProvider::default();
        let r = dispatch(&ctx(&p), &parse("current")).await.unwrap();
        assert_eq!(r.rows[0][4], "01 Sep 14:00 WEST");
        assert_eq!(r.rows[1][4], "2024-09-01T");
    }

    #[tokio::test]
    async fn misspelled_circuit_gets_a_suggestion() {
        let p = FakeProvider::default();
        let r = dispatch(&ctx(&p), &parse("results circuit silverston"))
            .await
            .unwrap();
        assert_eq!(r.header, "Circuit not found");
        assert_eq!(
            r.description.as_deref(),
            Some("No circuit with id 'silverston' was found.\nMaybe you meant?\n\t- silverstone")
        );
        assert!(p.circuit_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn circuit_results_newest_first_and_limited() {
        let p = FakeProvider::default();
        let r = dispatch(&ctx(&p), &parse("results circuit monza"))
            .await
            .unwrap();
        assert_eq!(r.header, "Winners in the last 10 races at Autodromo Nazionale di Monza");
        assert_eq!(r.rows.len(), 10);
        assert_eq!(r.rows[0][0], "2024");
        assert_eq!(r.rows[9][0], "2015");
        assert_eq!(*p.circuit_calls.lock().unwrap(), vec!["monza".to_string()]);
    }

    #[tokio::test]
    async fn driver_results_and_suggestions() {
        let p = FakeProvider::default();
        let r = dispatch(&ctx(&p), &parse("results driver leclerc"))
            .await
            .unwrap();
        assert_eq!(r.header, "Last 3 results for Charles Leclerc");
        assert_eq!(r.rows.len(), 3);
        assert_eq!(r.rows[0][0], "2024");
        // A race without a classified result still gets its row.
        assert_eq!(
            r.rows[1],
            vec!["2021", "Italian Grand Prix", "-", "-", "-", "-"]
        );

        let r = dispatch(&ctx(&p), &parse("results driver verstappen"))
            .await
            .unwrap();
        assert!(r.description.unwrap().ends_with("\t- max_verstappen"));
    }

    #[tokio::test]
    async fn missing_arguments_are_invalid() {
        let p = FakeProvider::default();
        for line in ["results", "results circuit", "results driver", "results team x"] {
            let err = dispatch(&ctx(&p), &parse(line)).await.unwrap_err();
            assert!(matches!(err, Error::InvalidCommand(_)), "{line}");
        }
    }

    #[tokio::test]
    async fn unknown_command_suggests_closest() {
        let p = FakeProvider::default();
        let r = dispatch(&ctx(&p), &parse("nxt")).await.unwrap();
        assert_eq!(
            r.description.as_deref(),
            Some("Command 'nxt' not recognized. Maybe you meant '!f1 next'? Send '!f1 help' for the list of commands.")
        );
    }

    #[tokio::test]
    async fn send_report_splits_long_tables() {
        let m = FakeMessenger::default();
        let mut r = Report::new("Long");
        r.set_table_header(["Round", "Circuit"]);
        for i in 0..30 {
            r.add_row([i.to_string(), "Some Circuit Name".to_string()])
                .unwrap();
        }
        send_report(&m, ChatId(7), &r).await.unwrap();

        let sent = m.sent.lock().unwrap();
        assert!(sent.len() > 1);
        assert!(sent.iter().all(|(c, html)| *c == ChatId(7) && html.len() <= 200));
    }

    #[test]
    fn error_reply_wraps_the_error() {
        let msg = error_reply(&Error::NotFound("no races".to_string()));
        assert!(msg.ends_with("The error reported is: not found: no races"));
    }
}
