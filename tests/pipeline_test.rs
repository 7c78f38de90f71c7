//! End-to-end pipeline tests against a scripted provider.

mod common;

use std::fs;
use std::sync::{Arc, Mutex};

use common::{complete_movie_details, complete_show_details, search_result, Call, LibraryFixture, StubProvider};
use marquee::metadata::MetadataProvider;
use marquee::pipeline::Pipeline;

async fn run(fixture: &LibraryFixture, provider: Arc<StubProvider>) -> marquee::pipeline::BuildReport {
    let provider: Arc<dyn MetadataProvider> = provider;
    Pipeline::new(fixture.config(), provider)
        .unwrap()
        .run()
        .await
        .unwrap()
}

fn movie_provider() -> StubProvider {
    StubProvider::new()
        .with_movie(
            "The Movie",
            vec![
                search_result(202, "The Movie Part 2", Some(2019)),
                search_result(101, "The Movie", Some(2019)),
            ],
        )
        .with_movie_details(101, complete_movie_details())
        .with_movie_details(202, complete_movie_details())
}

#[tokio::test]
async fn test_scene_release_resolves_to_exact_title() {
    let fixture = LibraryFixture::new();
    fixture.file("movies/The.Movie.2019.1080p.BluRay.x264-GROUP.mkv", 64);
    let provider = Arc::new(movie_provider());

    run(&fixture, provider.clone()).await;

    let meta = fixture.read_json("movies_meta.json");
    assert_eq!(meta["m1"]["title"], "The Movie");
    assert_eq!(meta["m1"]["year"], 2019);
    assert_eq!(meta["m1"]["overview"], "Overview of The Movie");
    assert_eq!(meta["m1"]["certification"], "PG-13");
    assert_eq!(meta["m1"]["runtime"], 112);
    assert_eq!(meta["m1"]["is_new"], true);

    assert_eq!(
        provider.calls(),
        vec![
            Call::SearchMovie {
                query: "The Movie".into(),
                year: Some(2019)
            },
            Call::MovieDetails(101),
        ]
    );

    let index = fixture.read_json("movies_index.json");
    assert!(index["m1"].as_str().unwrap().ends_with("The.Movie.2019.1080p.BluRay.x264-GROUP.mkv"));
}

#[tokio::test]
async fn test_second_run_leaves_cache_byte_identical() {
    let fixture = LibraryFixture::new();
    fixture.file("movies/The Movie (2019)/movie.mkv", 64);
    let provider = Arc::new(movie_provider());

    run(&fixture, provider.clone()).await;
    let cache_path = fixture.output_dir().join("tmdb_movies_cache.json");
    let first = fs::read(&cache_path).unwrap();

    provider.clear_calls();
    run(&fixture, provider.clone()).await;

    assert_eq!(first, fs::read(&cache_path).unwrap());
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_unwritable_cache_still_writes_catalog() {
    let fixture = LibraryFixture::new();
    fixture.file("movies/The Movie (2019)/movie.mkv", 64);
    fixture.file("standup/Comedian Title Special 2021/special.mkv", 32);
    fs::create_dir_all(fixture.output_dir().join("tmdb_movies_cache.json")).unwrap();

    run(&fixture, Arc::new(movie_provider())).await;

    let meta = fixture.read_json("movies_meta.json");
    assert_eq!(meta["m1"]["title"], "The Movie");
    assert_eq!(meta["m1"]["certification"], "PG-13");
    assert!(fixture.output_dir().join("standup_meta.json").is_file());
    assert!(fixture.output_dir().join("summary.json").is_file());
}

#[tokio::test]
async fn test_standup_is_searched_without_year() {
    let fixture = LibraryFixture::new();
    fixture.file("standup/Comedian Title Special 2021/special.mkv", 64);
    let provider = Arc::new(StubProvider::new());

    run(&fixture, provider.clone()).await;

    let searches: Vec<_> = provider
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::SearchMovie { query, year } => Some((query, year)),
            _ => None,
        })
        .collect();
    assert_eq!(searches[0], ("Comedian Title Special".to_string(), None));
    assert!(searches.iter().all(|(q, y)| y.is_none() && !q.contains("2021")));

    let meta = fixture.read_json("standup_meta.json");
    assert_eq!(meta["s1"]["title"], "Comedian Title Special");
    assert_eq!(meta["s1"]["year"], 2021);
}

#[tokio::test]
async fn test_shows_pick_larger_file_and_fill_titles() {
    let fixture = LibraryFixture::new();
    fixture.file("shows/Show.Name.S01E02.WEBRip.mp4", 10);
    let larger = fixture.file("shows/Show Name/Show.Name.S01E02.1080p.mkv", 500);
    let provider = Arc::new(
        StubProvider::new()
            .with_show("Show Name", vec![search_result(42, "Show Name", Some(2015))])
            .with_show_details(42, complete_show_details())
            .with_episode(42, 1, 2, "The Second One"),
    );

    let report = run(&fixture, provider.clone()).await;

    let episodes = fixture.read_json("episodes_index.json");
    assert_eq!(episodes["tv1_S01E02"], larger.to_str().unwrap());

    let shows = fixture.read_json("shows_meta.json");
    let show = &shows["tv1"];
    assert_eq!(show["title"], "Show Name");
    assert_eq!(show["tv_id"], 42);
    assert_eq!(show["first_year"], 2015);
    assert_eq!(show["seasons"]["1"][0]["eid"], "tv1_S01E02");
    assert_eq!(show["seasons"]["1"][0]["title"], "The Second One");
    assert_eq!(show["seasons"]["1"][0]["size"], 500);
    assert_eq!(show["is_new"], true);

    let episode_cache = fixture.read_json("tmdb_tv_ep_cache.json");
    assert_eq!(episode_cache["42|1|2"], "The Second One");
    assert_eq!((report.stats.shows.shows, report.stats.shows.episodes), (1, 1));
}

#[tokio::test]
async fn test_missing_credentials_still_writes_catalog() {
    let fixture = LibraryFixture::new();
    fixture.file("movies/Heat (1995)/heat.mkv", 64);
    fixture.file("movies/0-ARCHIVED/Alien (1979)/alien.mkv", 32);
    fixture.file("docs/Free Solo/free.solo.mkv", 16);
    let provider = Arc::new(StubProvider::unavailable());

    let report = run(&fixture, provider.clone()).await;

    assert!(provider.calls().is_empty());
    let meta = fixture.read_json("movies_meta.json");
    assert_eq!(meta["m1"]["title"], "Heat");
    assert_eq!(meta["m1"]["poster_url"], "");
    assert_eq!(meta["m2"]["archived"], true);

    let movies = &report.stats.categories[0];
    assert_eq!((movies.active, movies.archived, movies.total), (1, 1, 2));
    assert_eq!(movies.active_size.0, 64);
    assert_eq!(movies.archived_size.0, 32);

    let summary = fixture.read_json("summary.json");
    assert_eq!(summary["categories"].as_array().unwrap().len(), 3);
    assert_eq!(summary["categories"][2]["total"], 1);
}

#[tokio::test]
async fn test_unconfigured_categories_write_empty_outputs() {
    let fixture = LibraryFixture::new();
    let mut config = fixture.config();
    config.library.standup_root = None;
    config.library.shows_root = None;
    let provider: Arc<dyn MetadataProvider> = Arc::new(StubProvider::new());

    Pipeline::new(config, provider).unwrap().run().await.unwrap();

    assert_eq!(fixture.read_json("standup_meta.json"), serde_json::json!({}));
    assert_eq!(fixture.read_json("shows_meta.json"), serde_json::json!({}));
    assert_eq!(fixture.read_json("episodes_index.json"), serde_json::json!({}));
}

#[tokio::test]
async fn test_progress_reaches_completion() {
    let fixture = LibraryFixture::new();
    let steps = Arc::new(Mutex::new(Vec::new()));
    let sink = steps.clone();
    let provider: Arc<dyn MetadataProvider> = Arc::new(StubProvider::new());

    Pipeline::new(fixture.config(), provider)
        .unwrap()
        .with_progress_callback(Box::new(move |progress, step| {
            sink.lock().unwrap().push((progress, step.to_string()));
        }))
        .run()
        .await
        .unwrap();

    let steps = steps.lock().unwrap();
    assert_eq!(steps.first().unwrap().1, "Building movies");
    assert_eq!(steps.last().unwrap(), &(100.0, "Finalizing".to_string()));
}
