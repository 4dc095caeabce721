/// Stations offered by the station picker, in display order
pub const STATIONS: [&str; 28] = [
    "서울", "광명", "수원", "천안", "오송", "대전", "마산", "밀양", "구포", "평창", "강릉", "전주",
    "목포", "여수", "용산", "원주", "평택", "안동", "서산", "진주", "대구", "동해", "진부", "익산",
    "부산", "순천", "울산", "창원",
];

/// Whether `name` is one of [`STATIONS`]
pub fn is_known_station(name: &str) -> bool {
    STATIONS.contains(&name)
}
