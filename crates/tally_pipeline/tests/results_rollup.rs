mod common;

use common::{BrokenSource, Scenario};
use tally_core::{
    entities::Office,
    ids::{DistrictId, ListId},
    rounding::Percent,
};
use tally_io::snapshot::ElectionSnapshot;
use tally_pipeline::{PipelineError, ResultsAggregationService};

/// Two districts. "North" (id 2) has both offices; "Andes" (id 1) deputies only.
fn two_districts() -> ElectionSnapshot {
    let mut s = Scenario::new()
        .district(2, "North", Some(3))
        .district(1, "Andes", Some(2))
        .station(21, 2, 400)
        .station(22, 2, 600)
        .station(11, 1, 500)
        .list(200, 2, Office::Deputies, "Red")
        .list(201, 2, Office::Deputies, "Green")
        .list(202, 2, Office::Deputies, "Grey")
        .list(210, 2, Office::Senators, "Red")
        .list(100, 1, Office::Deputies, "Blue");
    // North deputies: Red 300 (2 stations), Green 150 (1 station), Grey none.
    s.tally_full(21, 200, Office::Deputies, 100, [2, 1, 0]);
    s.tally_full(22, 200, Office::Deputies, 200, [3, 0, 1]);
    s.tally_full(21, 201, Office::Deputies, 150, [0, 3, 0]);
    // North senators.
    s.tally_full(21, 210, Office::Senators, 500, [10, 0, 0]);
    // Andes deputies: Blue 240.
    s.tally_full(11, 100, Office::Deputies, 240, [5, 5, 0]);
    s.build()
}

#[test]
fn district_statistics_split_and_lists() {
    let snap = two_districts();
    let svc = ResultsAggregationService::new(&snap);
    let st = svc.district_statistics(DistrictId(2), Office::Deputies).unwrap();

    assert_eq!(st.district_name, "North");
    assert_eq!(st.tallies, 3);
    assert_eq!(st.split.valid, 450);
    assert_eq!((st.split.blank, st.split.null, st.split.contested), (5, 4, 1));
    assert_eq!(st.split.invalid, 10);
    assert_eq!(st.participation.votes_emitted, 460);
    assert_eq!(st.participation.electors, 1000);
    assert_eq!(st.participation.stations, 2);
    assert_eq!(st.participation.participation_pct, Percent::from_hundredths(4600));
    // 450 / 460 = 97.826…
    assert_eq!(st.split.valid_pct, Percent::from_hundredths(9783));

    let ids: Vec<ListId> = st.lists.iter().map(|l| l.list_id).collect();
    assert_eq!(ids, vec![ListId(200), ListId(201), ListId(202)]);
    assert_eq!(st.lists[0].tallies, 2);
    assert_eq!(st.lists[0].pct, Percent::from_hundredths(6667));
    assert_eq!(st.lists[2].votes, 0);
    assert_eq!(st.lists[2].pct, Percent::ZERO);
}

#[test]
fn statistics_are_office_scoped() {
    let snap = two_districts();
    let svc = ResultsAggregationService::new(&snap);
    let st = svc.district_statistics(DistrictId(2), Office::Senators).unwrap();
    assert_eq!(st.split.valid, 500);
    assert_eq!(st.split.invalid, 10);
    assert_eq!(st.tallies, 1);
    assert_eq!(st.participation.participation_pct, Percent::from_hundredths(5100));
}

#[test]
fn national_ranking_orders_and_counts_stations() {
    let snap = two_districts();
    let r = ResultsAggregationService::new(&snap)
        .national_ranking(Office::Deputies)
        .unwrap();

    assert_eq!(r.total_votes, 690);
    let rows: Vec<(u32, ListId, u64, u64)> = r
        .ranking
        .iter()
        .map(|e| (e.position, e.list_id, e.votes, e.stations_with_votes))
        .collect();
    // Grey has no votes and does not compete.
    assert_eq!(
        rows,
        vec![
            (1, ListId(200), 300, 2),
            (2, ListId(100), 240, 1),
            (3, ListId(201), 150, 1),
        ]
    );
    assert_eq!(r.ranking[0].pct, Percent::from_hundredths(4348));
    assert_eq!(r.ranking[1].district_id, DistrictId(1));
}

#[test]
fn national_results_roll_up_every_district() {
    let snap = two_districts();
    let n = ResultsAggregationService::new(&snap)
        .national_results(Office::Deputies)
        .unwrap();

    assert_eq!(n.total_votes, 690);
    assert_eq!(n.participation.electors, 1500);
    assert_eq!(n.participation.stations, 3);
    // 690 valid + 10 North + 10 Andes invalid.
    assert_eq!(n.participation.votes_emitted, 710);
    assert_eq!(n.participation.participation_pct, Percent::from_hundredths(4733));
    assert_eq!(n.split.invalid, 20);
    assert_eq!(n.ranking.len(), 3);

    let names: Vec<&str> = n.districts.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Andes", "North"]);
}

#[test]
fn summaries_by_name() {
    let snap = two_districts();
    let rows = ResultsAggregationService::new(&snap)
        .district_summaries(Office::Senators)
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Andes");
    assert_eq!(rows[0].deputy_seats, Some(2));
    assert_eq!(rows[0].senator_seats, 3);
    assert_eq!(rows[0].votes_emitted, 0);
    assert_eq!(rows[0].participation_pct, Percent::ZERO);
    assert_eq!(rows[1].tallies, 1);
    assert_eq!(rows[1].votes_emitted, 510);
}

#[test]
fn no_electors_means_zero_participation() {
    let snap = Scenario::new().district(1, "Empty", Some(1)).build();
    let svc = ResultsAggregationService::new(&snap);
    let n = svc.national_results(Office::Deputies).unwrap();
    assert_eq!(n.participation.participation_pct, Percent::ZERO);
    assert!(n.ranking.is_empty());
}

#[test]
fn unknown_district_and_source_failure() {
    let snap = two_districts();
    assert!(matches!(
        ResultsAggregationService::new(&snap).district_statistics(DistrictId(9), Office::Deputies),
        Err(PipelineError::DistrictNotFound(DistrictId(9)))
    ));
    assert!(matches!(
        ResultsAggregationService::new(BrokenSource).national_results(Office::Senators),
        Err(PipelineError::Source(_))
    ));
}
