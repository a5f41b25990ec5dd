// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub const JSONRPC_PATH: &str = "/jsonrpc";

pub const COMMON_SERVICE: &str = "common";
pub const COMMON_METHOD_AUTHENTICATE: &str = "authenticate";

pub const OBJECT_SERVICE: &str = "object";
pub const OBJECT_METHOD_EXECUTE: &str = "execute_kw";

pub const METHOD_FIELDS_GET: &str = "fields_get";
pub const METHOD_SEARCH: &str = "search";
pub const METHOD_SEARCH_READ: &str = "search_read";
pub const METHOD_READ: &str = "read";
