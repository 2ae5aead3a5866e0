// Activity histogram: words written per chat across the hours of the day.

pub mod time_of_day;
