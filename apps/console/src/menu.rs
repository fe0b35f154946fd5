//! Seed data for the in-memory catalog.

use chrono::{DateTime, Utc};
use shared::domain::{Comment, CommentId, DishId, DishView};
use uuid::Uuid;

pub fn dishes() -> Vec<DishView> {
    vec![
        dish(
            0,
            "Uthappizza",
            "A unique combination of Indian Uthappam (pancake) and Italian pizza, topped with Cerignola olives, ripe vine cherry tomatoes, Vidalia onion, Guntur chillies and Buffalo Paneer.",
            "images/uthappizza.png",
        ),
        dish(
            1,
            "Zucchipakoda",
            "Deep fried Zucchini coated with mildly spiced Chickpea flour batter accompanied with a sweet-tangy tamarind sauce",
            "images/zucchipakoda.png",
        ),
        dish(
            2,
            "Vadonut",
            "A quintessential ConFusion experience, is it a vada or is it a donut?",
            "images/vadonut.png",
        ),
        dish(
            3,
            "ElaiCheese Cake",
            "A delectable, semi-sweet New York Style Cheese Cake, with Graham cracker crust and spiced with Indian cardamoms",
            "images/elaicheesecake.png",
        ),
    ]
}

pub fn comments() -> Vec<Comment> {
    vec![
        comment(0, 5, "Imagine all the eatables, living in conFusion!", "John Lemon", "2012-10-16T17:57:28.556094Z"),
        comment(0, 4, "Sends anyone to heaven, I wish I could get my mother-in-law to eat it!", "Paul McVites", "2014-09-05T17:57:28.556094Z"),
        comment(0, 3, "Eat it, just eat it!", "Michael Jaikishan", "2015-02-13T17:57:28.556094Z"),
        comment(1, 4, "Ultimate, Reaching for the stars!", "Ringo Starry", "2013-12-02T17:57:28.556094Z"),
        comment(2, 2, "It's your birthday, we're gonna party!", "25 Cent", "2011-12-02T17:57:28.556094Z"),
    ]
}

fn dish(id: i64, name: &str, description: &str, image: &str) -> DishView {
    DishView {
        id: DishId(id),
        name: name.into(),
        description: description.into(),
        image: image.into(),
    }
}

fn comment(dish_id: i64, rating: u8, text: &str, author: &str, date: &str) -> Comment {
    Comment {
        id: CommentId(Uuid::new_v4()),
        dish_id: DishId(dish_id),
        rating,
        author: author.into(),
        comment: text.into(),
        date: DateTime::parse_from_rfc3339(date)
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or_default(),
    }
}
