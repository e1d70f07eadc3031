use chrono::{DateTime, Duration, Utc};

use crate::models::{DistanceBucket, Event};

struct DemoEvent {
    title: &'static str,
    city: &'static str,
    tags: &'static [&'static str],
    image_url: &'static str,
    recommended_majors: &'static [&'static str],
    price: Option<f64>,
    distance: DistanceBucket,
    is_opposite_major: bool,
}

const DEMO_EVENTS: &[DemoEvent] = &[
    DemoEvent {
        title: "Intro to 3D Printing Workshop",
        city: "Manchester",
        tags: &["STEM", "Makers", "Technology"],
        image_url: "https://media.printables.com/media/prints/16204/images/153738_3c777ac0-8795-4709-b6dd-248c94f267ee/thumbs/inside/1280x960/jpg/img_1579_16204.webp",
        recommended_majors: &["Art & Design", "Engineering"],
        price: None,
        distance: DistanceBucket::CityAway,
        is_opposite_major: true,
    },
    DemoEvent {
        title: "Stand-up Comedy Night",
        city: "Manchester",
        tags: &["Arts", "Performance", "Entertainment"],
        image_url: "https://roarnews.co.uk/wp-content/uploads/2024/10/Screenshot-2024-10-25-at-19.26.34.png",
        recommended_majors: &["Computer Science", "Engineering"],
        price: Some(8.0),
        distance: DistanceBucket::Nearby,
        is_opposite_major: true,
    },
    DemoEvent {
        title: "Startup Pitch Workshop",
        city: "Salford",
        tags: &["Business", "Startups", "Networking"],
        image_url: "https://www.entrepreneurscollective.biz/wp-content/uploads/2022/04/image.png",
        recommended_majors: &["Business", "Economics"],
        price: Some(15.0),
        distance: DistanceBucket::Local,
        is_opposite_major: false,
    },
    DemoEvent {
        title: "Creative Photography Walk",
        city: "Liverpool",
        tags: &["Art", "Photography", "Outdoor"],
        image_url: "https://gridphilly.com/wp-content/uploads/2023/06/thumbnail_July-dYojxB.tmp_.jpg",
        recommended_majors: &["STEM", "Business"],
        price: None,
        distance: DistanceBucket::CityAway,
        is_opposite_major: true,
    },
    DemoEvent {
        title: "AI in Healthcare Symposium",
        city: "Manchester",
        tags: &["Technology", "Healthcare", "AI"],
        image_url: "https://static.wixstatic.com/media/c31f4e_e59a45d205f342249e4e155451942099~mv2.png",
        recommended_majors: &["Medicine", "Computer Science"],
        price: Some(25.0),
        distance: DistanceBucket::Nearby,
        is_opposite_major: false,
    },
    DemoEvent {
        title: "Sustainable Fashion Workshop",
        city: "Salford",
        tags: &["Fashion", "Sustainability", "Design"],
        image_url: "https://sustainability.leeds.ac.uk/wp-content/uploads/sites/106/2024/02/IMG_3606.jpg",
        recommended_majors: &["Environmental Science", "Fashion Design"],
        price: Some(12.0),
        distance: DistanceBucket::Local,
        is_opposite_major: true,
    },
    DemoEvent {
        title: "Game Development Hackathon",
        city: "Manchester",
        tags: &["Gaming", "Technology", "Development"],
        image_url: "https://via.placeholder.com/640x360?text=Game+Dev+Hackathon",
        recommended_majors: &["Computer Science", "Digital Arts"],
        price: None,
        distance: DistanceBucket::Nearby,
        is_opposite_major: false,
    },
    DemoEvent {
        title: "Knitting night at the pub",
        city: "Liverpool",
        tags: &["Wellbeing", "Social", "Crafts"],
        image_url: "https://via.placeholder.com/640x360?text=Knitting+Night",
        recommended_majors: &["Fashion", "Art & Design"],
        price: None,
        distance: DistanceBucket::CityAway,
        is_opposite_major: true,
    },
];

/// Demo catalogue, one event per day starting at `now`. Ids are `"1"..="8"`.
pub fn demo_events(now: DateTime<Utc>) -> Vec<Event> {
    DEMO_EVENTS
        .iter()
        .enumerate()
        .map(|(i, demo)| Event {
            id: (i + 1).to_string(),
            title: demo.title.to_string(),
            occurs_at: now + Duration::days(i as i64),
            city: demo.city.to_string(),
            tags: demo.tags.iter().map(|t| t.to_string()).collect(),
            image_url: Some(demo.image_url.to_string()),
            recommended_majors: demo.recommended_majors.iter().map(|m| m.to_string()).collect(),
            is_paid: demo.price.is_some(),
            price_amount: demo.price,
            distance_bucket: demo.distance,
            is_opposite_major: demo.is_opposite_major,
        })
        .collect()
}
