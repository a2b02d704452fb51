use subway_sections::core::{LineRequest, LineUpdateRequest, SectionRequest};
use subway_sections::{
    InMemoryLineRepository, InMemoryStationDirectory, LineId, LineService, Station, SubwayError,
};

fn service() -> LineService<InMemoryStationDirectory, InMemoryLineRepository> {
    let stations = InMemoryStationDirectory::new([
        Station::new(1, "Gangnam"),
        Station::new(2, "Yeoksam"),
        Station::new(3, "Seolleung"),
        Station::new(4, "Jamsil"),
    ])
    .unwrap();
    LineService::new(stations, InMemoryLineRepository::new())
}

fn line_two() -> LineRequest {
    LineRequest {
        name: "Line 2".to_string(),
        color: "bg-green-600".to_string(),
        up_station_id: 1,
        down_station_id: 4,
        distance: 300,
    }
}

#[test]
fn test_create_find_update_delete() {
    let mut service = service();

    let created = service.save_line(&line_two()).unwrap();
    assert_eq!(created.id, LineId(1));
    assert_eq!(created.station_names(), vec!["Gangnam", "Jamsil"]);
    assert_eq!(created.stations[1].distance, 300);

    service
        .update_line(
            created.id,
            &LineUpdateRequest {
                name: "Circle Line".to_string(),
                color: "bg-green-700".to_string(),
            },
        )
        .unwrap();
    let summaries = service.find_all().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Circle Line");
    assert!(summaries[0].modified_at >= summaries[0].created_at);

    service.delete_line(created.id).unwrap();
    assert!(matches!(
        service.find_by_id(created.id),
        Err(SubwayError::LineNotFound { .. })
    ));
}

#[test]
fn test_invalid_requests_fail_before_lookup() {
    let mut service = service();
    let blank = LineRequest {
        name: "".to_string(),
        ..line_two()
    };
    assert!(matches!(
        service.save_line(&blank),
        Err(SubwayError::ValidationError { .. })
    ));

    let created = service.save_line(&line_two()).unwrap();
    let zero = SectionRequest {
        up_station_id: 1,
        down_station_id: 2,
        distance: 0,
    };
    assert!(matches!(
        service.add_section(created.id, &zero),
        Err(SubwayError::ValidationError { .. })
    ));
}

#[test]
fn test_sections_on_missing_line() {
    let mut service = service();
    let request = SectionRequest {
        up_station_id: 1,
        down_station_id: 2,
        distance: 10,
    };
    assert!(matches!(
        service.add_section(LineId(9), &request),
        Err(SubwayError::LineNotFound { .. })
    ));
    assert!(matches!(
        service.remove_section(LineId(9), subway_sections::StationId(1)),
        Err(SubwayError::LineNotFound { .. })
    ));
}

#[test]
fn test_edits_survive_reload_from_storage() {
    let mut service = service();
    let id = service.save_line(&line_two()).unwrap().id;
    for (up, down, distance) in [(1, 3, 200), (1, 2, 100)] {
        service
            .add_section(
                id,
                &SectionRequest {
                    up_station_id: up,
                    down_station_id: down,
                    distance,
                },
            )
            .unwrap();
    }

    let line = service.find_by_id(id).unwrap();
    assert_eq!(
        line.station_names(),
        vec!["Gangnam", "Yeoksam", "Seolleung", "Jamsil"]
    );
    let distances: Vec<u64> = line.stations.iter().map(|s| s.distance).collect();
    assert_eq!(distances, vec![0, 100, 100, 100]);
}
