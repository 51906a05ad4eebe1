/// Remove the element at `index`, keeping the order of the rest.
///
/// An out-of-range index leaves the collection untouched and returns `None`.
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    if index >= items.len() {
        return None;
    }
    Some(items.remove(index))
}

/// Seconds as `mm:ss`. Minutes keep growing past 99.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
