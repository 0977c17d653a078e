// src/supabase/query.rs
//! Minimal PostgREST request description
//!
//! A `PostgrestQuery` only describes the request; `SupabaseClient::run`
//! executes it. Keeping the two apart lets URL and header shaping be
//! checked without a network.

use reqwest::Method;
use serde_json::Value;

/// Accept header that makes PostgREST return one object instead of an array
pub const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Clone)]
pub struct PostgrestQuery {
    pub table: String,
    pub method: Method,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
    pub single: bool,
    pub returning: bool,
}

impl PostgrestQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            method: Method::GET,
            params: Vec::new(),
            body: None,
            single: false,
            returning: false,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params.push(("order".to_string(), format!("{}.{}", column, direction)));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    pub fn insert(mut self, row: Value) -> Self {
        self.method = Method::POST;
        self.body = Some(row);
        self.returning = true;
        self
    }

    pub fn update(mut self, changes: Value) -> Self {
        self.method = Method::PATCH;
        self.body = Some(changes);
        self.returning = true;
        self
    }

    pub fn delete(mut self) -> Self {
        self.method = Method::DELETE;
        self.returning = false;
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn url(&self, rest_base: &str) -> String {
        let qs = self.query_string();
        if qs.is_empty() {
            rest_base.to_string()
        } else {
            format!("{}?{}", rest_base, qs)
        }
    }

    pub fn prefer_header(&self) -> Option<&'static str> {
        if self.returning {
            Some("return=representation")
        } else {
            None
        }
    }
}
