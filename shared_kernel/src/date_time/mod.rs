pub mod tokyo_date_time;
